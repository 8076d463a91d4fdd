//! Wire types for the backend contract.
//!
//! Requests carry the new message plus every prior turn. Replies are loose
//! JSON objects; see [`extract_reply_text`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::message::ChatHistoryItem;

#[derive(Serialize)]
pub struct BackendRequest<'a> {
    pub message: &'a str,
    pub history: &'a [ChatHistoryItem],
}

/// Failure body produced by the serverless proxy.
#[derive(Deserialize, Debug, Default)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Reply fields the client recognizes, checked in this order.
pub const REPLY_FIELDS: [&str; 2] = ["output", "text"];

/// Pull the reply text out of a backend response.
///
/// The first recognized field holding a non-empty value wins. Strings are
/// taken verbatim, any other non-null value is rendered as JSON text.
/// Responses without a usable field produce an empty reply.
pub fn extract_reply_text(value: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| value.get(*field))
        .filter_map(|field| match field {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// One-line summary of an error body, for diagnostics.
pub fn summarize_error_body(body: &str) -> Option<String> {
    let parsed: BackendErrorBody = serde_json::from_str(body.trim()).ok()?;
    let summary = match (parsed.error, parsed.detail) {
        (Some(error), Some(detail)) if !detail.trim().is_empty() => {
            format!("{error}: {}", detail.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        (Some(error), _) => error,
        (None, Some(detail)) => detail,
        (None, None) => return None,
    };
    Some(summary.trim().to_string())
}
