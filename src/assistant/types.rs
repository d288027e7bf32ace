//! Wire types for the assistant service: runs, messages, content parts.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a run. The service owns this state machine; the
/// relay only reads it until a terminal value appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Expired,
    /// Any status this build does not know. Treated as still-running, so
    /// polling continues until the wait bound.
    #[serde(other)]
    Other,
}

impl RunStatus {
    /// Whether polling can stop at this status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Other => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Author role of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One message in a conversation thread. Listings arrive newest-first
/// when requested with descending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

/// One content part of a message. Only parts tagged `text` carry usable
/// data; other kinds (images, files) are ignored by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextPayload>,
}

/// Payload of a `text` content part. The value is kept as raw JSON so
/// the extractor can reject non-string values instead of failing at
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPayload {
    pub value: Value,
}

impl ContentPart {
    /// A plain `text` part, shaped the way the service renders assistant
    /// output. Used by the mock client and test stubs.
    pub fn text(value: &str) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(TextPayload {
                value: Value::String(value.to_string()),
            }),
        }
    }
}
