mod dialogs;
mod streaming;

use std::fmt;

use super::App;
use crate::core::chat_stream::StreamMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    SubmitMessage { message: String },
    AppendResponseChunk { content: String, stream_id: u64 },
    StreamCompleted { stream_id: u64 },
    StreamErrored { message: String, stream_id: u64 },
    RequestReset,
    ConfirmReset,
    CancelReset,
    OpenSettings,
    SaveSettings,
    UseDemoMode,
    CloseSettings,
}

impl AppAction {
    /// Translate a message from the stream service into the action it triggers.
    pub fn from_stream(message: StreamMessage, stream_id: u64) -> Self {
        match message {
            StreamMessage::Chunk(content) => AppAction::AppendResponseChunk { content, stream_id },
            StreamMessage::Error(message) => AppAction::StreamErrored { message, stream_id },
            StreamMessage::End => AppAction::StreamCompleted { stream_id },
        }
    }
}

/// Work the event loop must start on the view model's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// `epoch` is the session generation the reply belongs to.
    StartReply {
        stream_id: u64,
        epoch: u64,
        message: String,
    },
}

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    Blank,
    Busy,
}

impl fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRejection::Blank => write!(f, "input is blank"),
            SubmitRejection::Busy => write!(f, "a reply is still in progress"),
        }
    }
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { .. }
        | AppAction::AppendResponseChunk { .. }
        | AppAction::StreamCompleted { .. }
        | AppAction::StreamErrored { .. } => streaming::handle_streaming_action(app, action),

        AppAction::RequestReset
        | AppAction::ConfirmReset
        | AppAction::CancelReset
        | AppAction::OpenSettings
        | AppAction::SaveSettings
        | AppAction::UseDemoMode
        | AppAction::CloseSettings => dialogs::handle_dialog_action(app, action),
    }
}
