use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use futures_util::{stream, Stream};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::api::{extract_reply_text, summarize_error_body, BackendRequest};
use crate::core::config::Config;
use crate::core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_FRAGMENT_DELAY, DEMO_MODE_PREFIX};
use crate::core::message::ChatHistoryItem;
use crate::core::session::{ChatSession, InFlightSend};

/// Why a reply could not be produced.
#[derive(Debug)]
pub enum ChatError {
    /// Another send still holds the session.
    Busy,
    /// The conversation was reset after this send was requested.
    Retired,
    /// The request never produced an HTTP response, or its body could not be read.
    Network(reqwest::Error),
    /// The backend answered with a non-success status.
    Backend {
        status: u16,
        status_text: String,
        body: String,
    },
    /// The backend answered 2xx with something that is not JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Busy => write!(f, "A reply is already in progress"),
            ChatError::Retired => write!(f, "The conversation was reset before the reply started"),
            ChatError::Network(err) => write!(f, "Network error: {err}"),
            ChatError::Backend {
                status,
                status_text,
                body,
            } => {
                write!(f, "Backend error: HTTP {status} {status_text}")?;
                if let Some(summary) = summarize_error_body(body) {
                    write!(f, " ({summary})")?;
                }
                if !body.trim().is_empty() {
                    write!(f, "\n{}", body.trim())?;
                }
                Ok(())
            }
            ChatError::Parse(err) => write!(f, "Malformed backend response: {err}"),
        }
    }
}

impl StdError for ChatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Parse(err) => Some(err),
            ChatError::Busy | ChatError::Retired | ChatError::Backend { .. } => None,
        }
    }
}

/// How a full reply is cut up and paced when replayed as a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamPacing {
    /// Characters per fragment. Zero behaves like one.
    pub chunk_size: usize,
    /// Pause before each fragment.
    pub delay: Duration,
}

impl Default for StreamPacing {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delay: DEFAULT_FRAGMENT_DELAY,
        }
    }
}

impl StreamPacing {
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: config.stream_chunk_size.unwrap_or(defaults.chunk_size),
            delay: config
                .stream_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        }
    }

    /// Pacing without delays, for one-shot output and tests.
    pub fn immediate(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            delay: Duration::ZERO,
        }
    }
}

/// Canned reply used when no backend endpoint is configured.
pub fn demo_reply(message: &str) -> String {
    format!(
        "{DEMO_MODE_PREFIX}\n\
         我已收到你的訊息：\n\
         {message}\n\
         \n\
         若你想啟用真正的 AI 回覆：\n\
         請按 Ctrl+S 開啟「設定」→ 貼上你的後端 API Endpoint（例如 Cloudflare Workers / Netlify Functions）。\n\
         ⚠️ 請勿把 API Key 放在前端或設定檔以外的地方。"
    )
}

/// Split `text` into fragments of `chunk_size` characters; the last one may be shorter.
pub fn split_fragments(text: &str, chunk_size: usize) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = fragment_end(rest, chunk_size);
        fragments.push(&rest[..end]);
        rest = &rest[end..];
    }
    fragments
}

fn fragment_end(text: &str, chunk_size: usize) -> usize {
    text.char_indices()
        .nth(chunk_size.max(1))
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// The backend a reply is resolved against, selected from the endpoint at send time.
#[derive(Debug, Clone)]
pub enum StreamSource {
    /// Synthesized demo reply, no network.
    Local,
    /// One POST to a user-configured endpoint.
    Remote(RemoteBackend),
}

#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl StreamSource {
    pub fn for_endpoint(endpoint: &str, client: &reqwest::Client) -> Self {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            StreamSource::Local
        } else {
            StreamSource::Remote(RemoteBackend {
                client: client.clone(),
                endpoint: endpoint.to_string(),
            })
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, StreamSource::Local)
    }

    /// Produce the complete reply text for `message`.
    ///
    /// `history` already ends with the user turn for `message`.
    pub async fn resolve(
        &self,
        message: &str,
        history: &[ChatHistoryItem],
    ) -> Result<String, ChatError> {
        match self {
            StreamSource::Local => Ok(demo_reply(message)),
            StreamSource::Remote(backend) => backend.fetch_reply(message, history).await,
        }
    }
}

impl RemoteBackend {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_reply(
        &self,
        message: &str,
        history: &[ChatHistoryItem],
    ) -> Result<String, ChatError> {
        let request = BackendRequest { message, history };
        debug!(endpoint = %self.endpoint, turns = history.len(), "posting to backend");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ChatError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Backend {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let body = response.text().await.map_err(ChatError::Network)?;
        let value: serde_json::Value = serde_json::from_str(&body).map_err(ChatError::Parse)?;
        let reply = extract_reply_text(&value);
        info!(
            endpoint = %self.endpoint,
            chars = reply.chars().count(),
            "backend reply received"
        );
        Ok(reply)
    }
}

/// A reply replayed as an ordered, non-restartable sequence of fragments.
///
/// When the final fragment is produced the full reply is committed to the
/// owning session's history. A stream dropped before that point never
/// commits.
pub struct ReplyStream {
    text: String,
    cursor: usize,
    pacing: StreamPacing,
    pending: Option<InFlightSend>,
}

impl fmt::Debug for ReplyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyStream")
            .field("len", &self.text.len())
            .field("cursor", &self.cursor)
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl ReplyStream {
    pub(crate) fn new(text: String, pacing: StreamPacing, pending: InFlightSend) -> Self {
        Self {
            text,
            cursor: 0,
            pacing,
            pending: Some(pending),
        }
    }

    /// A stream with no session behind it.
    pub fn detached(text: impl Into<String>, pacing: StreamPacing) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            pacing,
            pending: None,
        }
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.text.len()
    }

    pub async fn next_fragment(&mut self) -> Option<String> {
        if self.is_finished() {
            self.complete();
            return None;
        }

        if !self.pacing.delay.is_zero() {
            tokio::time::sleep(self.pacing.delay).await;
        }

        let rest = &self.text[self.cursor..];
        let end = fragment_end(rest, self.pacing.chunk_size);
        let fragment = rest[..end].to_string();
        self.cursor += end;

        if self.is_finished() {
            self.complete();
        }
        Some(fragment)
    }

    pub fn into_stream(self) -> impl Stream<Item = String> + Send {
        stream::unfold(self, |mut reply| async move {
            let fragment = reply.next_fragment().await?;
            Some((fragment, reply))
        })
    }

    fn complete(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.commit_reply(self.text.clone());
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Chunk(String),
    /// The reply failed; no `End` follows.
    Error(String),
    End,
}

/// Runs replies on background tasks and forwards their fragments, tagged
/// with a stream id, to whoever owns the receiver.
#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_reply(&self, session: ChatSession, epoch: u64, message: String, stream_id: u64) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            forward_reply(&session, epoch, &message, stream_id, &tx).await;
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}

/// Send `message` through `session` and forward every fragment in order.
///
/// Nothing is forwarded when `session` was reset after `epoch` was read.
pub async fn forward_reply(
    session: &ChatSession,
    epoch: u64,
    message: &str,
    stream_id: u64,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
) {
    let mut reply = match session.send_in_epoch(epoch, message).await {
        Ok(reply) => reply,
        Err(ChatError::Retired) => {
            debug!(stream_id, epoch, "dropping reply requested before a reset");
            return;
        }
        Err(err) => {
            error!(stream_id, error = %err, "reply failed");
            let _ = tx.send((StreamMessage::Error(err.to_string()), stream_id));
            return;
        }
    };

    while let Some(fragment) = reply.next_fragment().await {
        if tx.send((StreamMessage::Chunk(fragment), stream_id)).is_err() {
            debug!(stream_id, "receiver closed mid-reply");
            return;
        }
    }
    let _ = tx.send((StreamMessage::End, stream_id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn fragments_have_constant_size_except_the_last() {
        let text = "a".repeat(50);
        let fragments = split_fragments(&text, 24);
        assert_eq!(
            fragments.iter().map(|f| f.len()).collect::<Vec<_>>(),
            vec![24, 24, 2]
        );
    }

    #[test]
    fn fragments_split_on_character_boundaries() {
        let fragments = split_fragments("膝蓋痛膝蓋痛膝", 3);
        assert_eq!(fragments, vec!["膝蓋痛", "膝蓋痛", "膝"]);
        assert_eq!(split_fragments("abc", 0), vec!["a", "b", "c"]);
        assert!(split_fragments("", 24).is_empty());
    }

    #[test]
    fn demo_reply_echoes_the_message() {
        let reply = demo_reply("膝蓋痛");
        assert!(reply.starts_with("（示範模式：未設定後端）\n"));
        assert!(reply.contains("\n膝蓋痛\n"));
    }

    #[test]
    fn blank_endpoint_selects_local_source() {
        let client = reqwest::Client::new();
        assert!(StreamSource::for_endpoint("  ", &client).is_local());
        match StreamSource::for_endpoint(" https://coach.example.com/chat ", &client) {
            StreamSource::Remote(backend) => {
                assert_eq!(backend.endpoint(), "https://coach.example.com/chat")
            }
            StreamSource::Local => panic!("expected remote source"),
        }
    }

    #[tokio::test]
    async fn detached_stream_replays_the_full_text() {
        let text = demo_reply("膝蓋痛");
        let fragments: Vec<String> = ReplyStream::detached(text.clone(), StreamPacing::immediate(24))
            .into_stream()
            .collect()
            .await;

        assert_eq!(fragments.concat(), text);
        let (last, rest) = fragments.split_last().expect("fragments");
        assert!(rest.iter().all(|f| f.chars().count() == 24));
        assert!(last.chars().count() <= 24);
    }

    #[tokio::test]
    async fn exhausted_stream_stays_exhausted() {
        let mut reply = ReplyStream::detached("短", StreamPacing::immediate(24));
        assert_eq!(reply.next_fragment().await.as_deref(), Some("短"));
        assert!(reply.is_finished());
        assert_eq!(reply.next_fragment().await, None);
        assert_eq!(reply.next_fragment().await, None);
    }

    #[test]
    fn pacing_reads_overrides_from_config() {
        let config = Config {
            stream_chunk_size: Some(8),
            stream_delay_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(StreamPacing::from_config(&config), StreamPacing::immediate(8));
        assert_eq!(StreamPacing::from_config(&Config::default()), StreamPacing::default());
    }

    #[test]
    fn backend_error_display_includes_status_and_body() {
        let err = ChatError::Backend {
            status: 500,
            status_text: "Internal Server Error".into(),
            body: r#"{"error":"Upstream error","detail":"quota"}"#.into(),
        };
        let text = err.to_string();
        assert!(text.starts_with("Backend error: HTTP 500 Internal Server Error (Upstream error: quota)"));
        assert!(text.ends_with(r#"{"error":"Upstream error","detail":"quota"}"#));
    }
}
