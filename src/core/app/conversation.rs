use tracing::{debug, error, warn};

use super::{App, SubmitRejection};
use crate::core::constants::{CONNECTION_ERROR_MESSAGE, INITIAL_MESSAGE};
use crate::core::message::Message;

/// Mutates the message list while keeping the loading/error flags and the
/// streaming placeholder consistent with it.
pub struct ConversationController<'a> {
    app: &'a mut App,
}

impl<'a> ConversationController<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn show_greeting(&mut self) {
        let id = self.app.allocate_message_id();
        self.app
            .messages
            .push_back(Message::model(id, INITIAL_MESSAGE));
    }

    /// Record the user's turn and open a streaming placeholder for the reply.
    ///
    /// Returns the stream id the reply must be tagged with and the trimmed
    /// text to send.
    pub fn begin_reply(&mut self, input: &str) -> Result<(u64, String), SubmitRejection> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SubmitRejection::Blank);
        }
        if self.app.is_loading {
            return Err(SubmitRejection::Busy);
        }

        self.app.error = None;

        let user_id = self.app.allocate_message_id();
        self.app.messages.push_back(Message::user(user_id, text));
        if let Err(e) = self.app.logging.log_message(&format!("你: {text}")) {
            warn!(error = %e, "failed to write transcript");
        }

        let reply_id = self.app.allocate_message_id();
        self.app
            .messages
            .push_back(Message::model_placeholder(reply_id));
        self.app.streaming_message = Some(reply_id);
        self.app.is_loading = true;
        self.app.current_stream_id += 1;
        self.app.ui.scroll_to_bottom();

        debug!(stream_id = self.app.current_stream_id, "awaiting reply");
        Ok((self.app.current_stream_id, text.to_string()))
    }

    pub fn append_to_response(&mut self, fragment: &str) {
        if let Some(message) = self.streaming_message_mut() {
            message.text.push_str(fragment);
        }
    }

    pub fn finalize_response(&mut self) {
        let finished = self.streaming_message_mut().map(|message| {
            message.is_streaming = false;
            message.text.clone()
        });
        self.app.streaming_message = None;
        self.app.is_loading = false;

        if let Some(text) = finished {
            if let Err(e) = self.app.logging.log_message(&text) {
                warn!(error = %e, "failed to write transcript");
            }
        }
        debug!(stream_id = self.app.current_stream_id, "reply complete");
    }

    /// Drop the partial reply and surface the generic connection error.
    /// `detail` only goes to the diagnostics log.
    pub fn fail_response(&mut self, detail: &str) {
        if let Some(id) = self.app.streaming_message.take() {
            self.app.messages.retain(|message| message.id != id);
        }
        self.app.is_loading = false;
        self.app.error = Some(CONNECTION_ERROR_MESSAGE.to_string());
        error!(
            stream_id = self.app.current_stream_id,
            detail = detail.trim(),
            "reply failed"
        );
    }

    /// Start over with an empty history and a fresh greeting.
    pub fn reset(&mut self) {
        self.app.messages.clear();
        self.app.session.reset();
        self.app.error = None;
        self.app.is_loading = false;
        self.app.streaming_message = None;
        // Anything still arriving for the old stream id is ignored from now on.
        self.app.current_stream_id += 1;
        self.app.ui.scroll_to_bottom();
        self.show_greeting();

        if let Err(e) = self.app.logging.log_header("重新開始對話") {
            warn!(error = %e, "failed to write transcript");
        }
        debug!("conversation reset");
    }

    fn streaming_message_mut(&mut self) -> Option<&mut Message> {
        let id = self.app.streaming_message?;
        self.app
            .messages
            .iter_mut()
            .rev()
            .find(|message| message.id == id)
    }
}
