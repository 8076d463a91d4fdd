//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, installs diagnostics, wires the
//! persisted configuration into a chat session, and dispatches to the chosen
//! command.

pub mod say;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::cli::say::run_say;
use crate::cli::settings::{SetContext, SettingRegistry};
use crate::core::chat_stream::StreamPacing;
use crate::core::config::{Config, ConfigOrchestrator, EndpointConfig};
use crate::core::session::ChatSession;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics::{init_tracing, LogTarget, LOG_FILTER_ENV};
use crate::utils::logging::LoggingState;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", ",
    env!("VERGEN_GIT_COMMIT_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(name = "orange-coach")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "橘子老師: an AI cycling coach in your terminal")]
#[command(
    long_about = "橘子老師 is a full-screen terminal chat with an AI cycling coach. \
Describe what hurts or what you want to train and the coach replies, streamed as it is written.\n\n\
Without a backend endpoint the coach runs in demo mode and echoes your message. \
Point it at your own serverless proxy to get real answers:\n\
  orange-coach set endpoint https://your-worker.example.com/chat\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  PageUp/PageDown   Scroll the conversation\n\
  Ctrl+R            Start over (asks for confirmation)\n\
  Ctrl+S            Endpoint settings\n\
  Ctrl+C            Quit\n\n\
Environment Variables:\n\
  ORANGE_COACH_LOG  Diagnostics filter, e.g. debug or orange_coach=info (default: warn)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a plain-text transcript of the conversation to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply as it streams
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set a configuration value (endpoint, chunk-size, delay-ms)
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the effective configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    let target = match command {
        Commands::Chat => match Config::default_log_path() {
            Ok(path) => LogTarget::File(path),
            Err(_) => LogTarget::Stderr,
        },
        _ => LogTarget::Stderr,
    };
    if let Err(err) = init_tracing(target) {
        eprintln!("⚠️  Diagnostics disabled ({LOG_FILTER_ENV}): {err}");
    }

    tokio::runtime::Runtime::new()?.block_on(async_main(command, args.config, args.log))
}

fn orchestrator_for(config_path: Option<PathBuf>) -> Result<ConfigOrchestrator, Box<dyn Error>> {
    match config_path {
        Some(path) => Ok(ConfigOrchestrator::new(path)),
        None => Ok(ConfigOrchestrator::from_default_path()?),
    }
}

/// Build the session the chat and `say` commands share. Configuration
/// problems never stop the coach: it falls back to an in-memory endpoint
/// (demo mode) and default pacing.
fn build_session(config_path: Option<PathBuf>) -> ChatSession {
    let (endpoint, pacing) = match orchestrator_for(config_path) {
        Ok(orchestrator) => {
            let pacing = match orchestrator.load_with_cache() {
                Ok(config) => StreamPacing::from_config(&config),
                Err(err) => {
                    warn!(error = %err, "config unreadable, using default pacing");
                    StreamPacing::default()
                }
            };
            (EndpointConfig::new(Arc::new(orchestrator)), pacing)
        }
        Err(err) => {
            warn!(error = %err, "no config location, endpoint changes will not persist");
            (EndpointConfig::in_memory(""), StreamPacing::default())
        }
    };

    ChatSession::new(endpoint, reqwest::Client::new(), pacing)
}

async fn async_main(
    command: Commands,
    config_path: Option<PathBuf>,
    log: Option<String>,
) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Chat => {
            let logging = LoggingState::new(log)?;
            run_chat(build_session(config_path), logging).await
        }
        Commands::Say { prompt } => run_say(build_session(config_path), prompt).await,
        Commands::Set { key, value } => {
            let orchestrator = orchestrator_for(config_path)?;
            let ctx = SetContext {
                orchestrator: &orchestrator,
            };
            match SettingRegistry::new().set(&key, &value, &ctx) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let orchestrator = orchestrator_for(config_path)?;
            let ctx = SetContext {
                orchestrator: &orchestrator,
            };
            match SettingRegistry::new().unset(&key, &ctx) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Config => {
            let orchestrator = orchestrator_for(config_path)?;
            let config = orchestrator.load_with_cache()?;
            config.print_all(orchestrator.path());
            Ok(())
        }
    }
}
