//! Chat view model.
//!
//! [`App`] owns everything the terminal UI renders: the message list, the
//! loading and error flags, and the UI-only state in [`ui_state::UiState`].
//! It never runs a reply itself. Submitting returns an [`AppCommand`] that the
//! event loop hands to the stream service, and every fragment coming back is
//! applied as its own [`AppAction`].

mod actions;
mod conversation;
mod settings;
pub mod ui_state;


use std::collections::VecDeque;

pub use actions::{apply_action, apply_actions, AppAction, AppCommand, SubmitRejection};
pub use conversation::ConversationController;
pub use settings::{SettingsController, SettingsDialog};

use crate::core::message::{Message, MessageId};
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;
use crate::utils::url::mode_label;
use ui_state::UiState;

/// Where the view model is in the submit/reply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    Idle,
    /// Exactly one reply is outstanding; submission is disabled.
    AwaitingReply,
    /// The last reply failed. New input is accepted.
    Error,
}

pub struct App {
    pub session: ChatSession,
    pub ui: UiState,
    pub logging: LoggingState,
    messages: VecDeque<Message>,
    is_loading: bool,
    error: Option<String>,
    current_stream_id: u64,
    streaming_message: Option<MessageId>,
    next_message_id: u64,
    mode_label: String,
}

impl App {
    pub fn new(session: ChatSession, logging: LoggingState) -> Self {
        let mode_label = mode_label(&session.endpoint().get());
        let mut app = Self {
            session,
            ui: UiState::new(),
            logging,
            messages: VecDeque::new(),
            is_loading: false,
            error: None,
            current_stream_id: 0,
            streaming_message: None,
            next_message_id: 0,
            mode_label,
        };
        app.conversation().show_greeting();
        app
    }

    /// Returns a controller for message-list operations.
    pub fn conversation(&mut self) -> ConversationController<'_> {
        ConversationController::new(self)
    }

    /// Returns a controller for the endpoint settings dialog.
    pub fn settings(&mut self) -> SettingsController<'_> {
        SettingsController::new(self)
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    pub fn state(&self) -> ReplyState {
        if self.is_loading {
            ReplyState::AwaitingReply
        } else if self.error.is_some() {
            ReplyState::Error
        } else {
            ReplyState::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_stream_id(&self) -> u64 {
        self.current_stream_id
    }

    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        self.is_loading && self.current_stream_id == stream_id
    }

    /// Header text describing where replies come from.
    pub fn mode_label(&self) -> &str {
        &self.mode_label
    }

    pub(crate) fn refresh_mode_label(&mut self) {
        self.mode_label = mode_label(&self.session.endpoint().get());
    }

    fn allocate_message_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId::new(self.next_message_id)
    }
}
