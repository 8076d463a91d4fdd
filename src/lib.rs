//! 橘子老師 (Orange Coach) is a terminal chat with an AI cycling coach.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat session and its history, reply resolution and
//!   simulated streaming, the persisted endpoint configuration, and the view
//!   model the terminal UI renders.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that turns key presses and reply fragments into view-model actions.
//! - [`api`] defines the JSON payloads exchanged with the backend proxy.
//! - [`utils`] holds diagnostics setup, the transcript log, and URL helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which wires configuration into a
//! [`core::session::ChatSession`] and dispatches to [`ui::chat_loop`] or the
//! one-shot `say` command.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
