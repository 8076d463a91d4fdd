//! Conversation history and the single in-flight send.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::core::chat_stream::{ChatError, ReplyStream, StreamPacing, StreamSource};
use crate::core::config::EndpointConfig;
use crate::core::message::ChatHistoryItem;

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<ChatHistoryItem>,
    /// Bumped on reset; sends from an older epoch can no longer touch state.
    epoch: u64,
    in_flight: bool,
}

/// One conversation with the coach.
///
/// Clones share history, so the UI can reset the session while a background
/// task owns another handle for sending.
#[derive(Clone, Debug)]
pub struct ChatSession {
    state: Arc<Mutex<SessionState>>,
    endpoint: EndpointConfig,
    client: reqwest::Client,
    pacing: StreamPacing,
}

impl ChatSession {
    pub fn new(endpoint: EndpointConfig, client: reqwest::Client, pacing: StreamPacing) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            endpoint,
            client,
            pacing,
        }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn pacing(&self) -> StreamPacing {
        self.pacing
    }

    /// Forget every prior turn. A reply still in flight is retired: it will
    /// neither reach history nor block the next send.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.history.clear();
        state.epoch += 1;
        state.in_flight = false;
        debug!(epoch = state.epoch, "chat session reset");
    }

    pub fn history(&self) -> Vec<ChatHistoryItem> {
        self.lock().history.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().in_flight
    }

    /// Current conversation generation. Every reset starts a new one.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Record `user_text` and resolve a reply for it.
    ///
    /// The user turn stays in history even when the reply fails. The model
    /// turn is appended by the returned stream once it is exhausted.
    pub async fn send(&self, user_text: &str) -> Result<ReplyStream, ChatError> {
        let (pending, history) = self.begin_send(user_text, None)?;
        self.resolve(user_text, pending, history).await
    }

    /// Like [`send`](Self::send), but only if no reset happened since
    /// `epoch` was read. A send queued before a reset fails with
    /// [`ChatError::Retired`] and leaves the new conversation untouched.
    pub async fn send_in_epoch(
        &self,
        epoch: u64,
        user_text: &str,
    ) -> Result<ReplyStream, ChatError> {
        let (pending, history) = self.begin_send(user_text, Some(epoch))?;
        self.resolve(user_text, pending, history).await
    }

    async fn resolve(
        &self,
        user_text: &str,
        pending: InFlightSend,
        history: Vec<ChatHistoryItem>,
    ) -> Result<ReplyStream, ChatError> {
        let source = StreamSource::for_endpoint(&self.endpoint.get(), &self.client);
        debug!(local = source.is_local(), "resolving reply");
        let reply = source.resolve(user_text, &history).await?;

        Ok(ReplyStream::new(reply, self.pacing, pending))
    }

    fn begin_send(
        &self,
        user_text: &str,
        expected_epoch: Option<u64>,
    ) -> Result<(InFlightSend, Vec<ChatHistoryItem>), ChatError> {
        let mut state = self.lock();
        if expected_epoch.is_some_and(|epoch| epoch != state.epoch) {
            return Err(ChatError::Retired);
        }
        if state.in_flight {
            return Err(ChatError::Busy);
        }
        state.in_flight = true;
        state.history.push(ChatHistoryItem::user(user_text));

        let pending = InFlightSend {
            state: Arc::clone(&self.state),
            epoch: state.epoch,
        };
        Ok((pending, state.history.clone()))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Claim on the session's single send slot. Released on drop.
pub(crate) struct InFlightSend {
    state: Arc<Mutex<SessionState>>,
    epoch: u64,
}

impl InFlightSend {
    pub(crate) fn commit_reply(self, text: String) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.epoch == self.epoch {
            state.history.push(ChatHistoryItem::model(text));
        } else {
            debug!(epoch = self.epoch, "discarding reply from a reset session");
        }
    }
}

impl Drop for InFlightSend {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.epoch == self.epoch {
            state.in_flight = false;
        }
    }
}
