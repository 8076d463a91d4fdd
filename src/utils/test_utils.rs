use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::core::app::App;
use crate::core::chat_stream::StreamPacing;
use crate::core::config::EndpointConfig;
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;

pub fn create_test_session(endpoint: &str) -> ChatSession {
    ChatSession::new(
        EndpointConfig::in_memory(endpoint),
        reqwest::Client::new(),
        StreamPacing::immediate(24),
    )
}

/// An app in demo mode with no fragment delay and no transcript.
pub fn create_test_app() -> App {
    create_test_app_with_endpoint("")
}

pub fn create_test_app_with_endpoint(endpoint: &str) -> App {
    App::new(
        create_test_session(endpoint),
        LoggingState::new(None).unwrap(),
    )
}

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A backend on an ephemeral local port that answers each connection with
/// the next queued response and records the JSON request bodies.
pub struct MockBackend {
    url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub async fn requests(&self) -> Vec<Value> {
        self.requests.lock().await.clone()
    }
}

pub async fn spawn_mock_backend(responses: Vec<MockResponse>) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&requests);

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(body) = read_http_body(&mut stream).await else {
                continue;
            };
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            captured.lock().await.push(json);

            let reason = reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown");
            let raw = format!(
                "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
                response.status,
                reason,
                response.body.len(),
                response.body
            );
            let _ = stream.write_all(raw.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    MockBackend {
        url: format!("http://{addr}/chat"),
        requests,
    }
}

/// URL of a local port nothing is listening on.
pub fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);
    format!("http://{addr}/chat")
}

async fn read_http_body(stream: &mut TcpStream) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let content_length = header_text
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.trim().parse::<usize>())
        .transpose()
        .map_err(|err| err.to_string())?
        .unwrap_or(0);

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);
    Ok(body)
}
