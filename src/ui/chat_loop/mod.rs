//! The full-screen chat loop.
//!
//! Three sources feed the loop: terminal events read on a helper task, reply
//! fragments from [`ChatStreamService`], and a redraw tick. All of them end up
//! as [`AppAction`]s applied on this task, so the view model has exactly one
//! writer.

mod keybindings;
mod lifecycle;

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::app::{apply_actions, App, AppAction, AppCommand};
use crate::core::chat_stream::ChatStreamService;
use crate::core::session::ChatSession;
use crate::ui::renderer::{max_scroll, ui};
use crate::utils::logging::LoggingState;
use keybindings::{handle_key, handle_paste, KeyResult};
use lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

const TICK: Duration = Duration::from_millis(250);

enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Apply `actions` and start whatever replies they ask for.
fn dispatch(app: &mut App, stream_service: &ChatStreamService, actions: Vec<AppAction>) {
    for command in apply_actions(app, actions) {
        match command {
            AppCommand::StartReply {
                stream_id,
                epoch,
                message,
            } => {
                debug!(stream_id, epoch, "spawning reply task");
                stream_service.spawn_reply(app.session.clone(), epoch, message, stream_id);
            }
        }
    }
}

/// Returns `true` when the user asked to quit.
fn handle_ui_event(app: &mut App, stream_service: &ChatStreamService, event: UiEvent) -> bool {
    match event {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            match handle_key(app, key) {
                KeyResult::Exit => return true,
                KeyResult::Actions(actions) => dispatch(app, stream_service, actions),
                KeyResult::Handled => {}
            }
        }
        UiEvent::Crossterm(Event::Paste(text)) => handle_paste(app, &text),
        UiEvent::Crossterm(_) => {}
    }
    false
}

fn draw_frame(f: &mut Frame, app: &mut App) {
    let max = max_scroll(app, f.area());
    app.ui.clamp_scroll(max);
    ui(f, app);
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let (stream_service, mut stream_rx) = ChatStreamService::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);
    let mut tick = tokio::time::interval(TICK);

    let result = loop {
        if let Err(err) = terminal.draw(|f| draw_frame(f, app)) {
            break Err(err.into());
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                if handle_ui_event(app, &stream_service, event) {
                    break Ok(());
                }
            }
            Some((message, stream_id)) = stream_rx.recv() => {
                // One action per fragment so every chunk is drawn.
                dispatch(app, &stream_service, vec![AppAction::from_stream(message, stream_id)]);
            }
            _ = tick.tick() => {}
        }
    };

    event_reader_handle.abort();
    result
}

pub async fn run_chat(session: ChatSession, logging: LoggingState) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(session, logging);
    info!(mode = app.mode_label(), "starting chat");

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;
    restore_terminal(&mut terminal)?;

    result
}
