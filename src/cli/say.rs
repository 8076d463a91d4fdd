//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use futures_util::StreamExt;
use tracing::error;

use crate::core::constants::CONNECTION_ERROR_MESSAGE;
use crate::core::session::ChatSession;

pub async fn run_say(session: ChatSession, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: orange-coach say <prompt>");
        std::process::exit(2);
    }

    let mut stdout = io::stdout();
    if let Err(code) = say_to(&session, &prompt, &mut stdout).await? {
        std::process::exit(code);
    }
    Ok(())
}

/// Stream the reply to `prompt` into `out`, fragment by fragment.
///
/// The outer `Result` carries I/O failures on `out`; the inner one is the exit
/// code to use when the coach could not answer.
pub async fn say_to<W: Write>(
    session: &ChatSession,
    prompt: &str,
    out: &mut W,
) -> io::Result<Result<(), i32>> {
    let reply = match session.send(prompt.trim()).await {
        Ok(reply) => reply,
        Err(err) => {
            error!(error = %err, "say failed");
            eprintln!("❌ {CONNECTION_ERROR_MESSAGE}");
            eprintln!("{err}");
            return Ok(Err(1));
        }
    };

    let mut fragments = reply.into_stream().boxed();
    while let Some(fragment) = fragments.next().await {
        out.write_all(fragment.as_bytes())?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(Ok(()))
}
