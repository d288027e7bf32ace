//! Reply handling: locate the assistant's newest message in a thread
//! listing and parse its text as JSON.

use serde_json::Value;
use thiserror::Error;

use crate::assistant::{MessageRole, ThreadMessage};

/// How many recent messages to scan for the assistant's reply.
pub const MESSAGE_LOOKBACK: u8 = 10;

#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("No assistant message found in recent thread history")]
    NoAssistantMessage,

    #[error("Assistant message has no text content")]
    NoTextContent,

    #[error("Assistant reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pull the reply text out of a newest-first message listing.
///
/// Takes the first assistant-authored message and, within it, the first
/// part tagged `text`. The text comes back verbatim; trimming is the
/// parser's job.
pub fn extract_reply_text(messages: &[ThreadMessage]) -> Result<String, ReplyError> {
    let reply = messages
        .iter()
        .find(|m| m.role == MessageRole::Assistant)
        .ok_or(ReplyError::NoAssistantMessage)?;

    let text = reply
        .content
        .iter()
        .find(|part| part.kind == "text")
        .and_then(|part| part.text.as_ref())
        .and_then(|payload| payload.value.as_str())
        .ok_or(ReplyError::NoTextContent)?;

    Ok(text.to_string())
}

/// Parse the assistant's reply as JSON, unwrapping one markdown code
/// fence if present. No schema is enforced here; key mapping is the
/// normalizer's job.
pub fn parse_directive(raw: &str) -> Result<Value, ReplyError> {
    let trimmed = raw.trim();
    let candidate = fenced_block(trimmed).unwrap_or(trimmed);
    Ok(serde_json::from_str(candidate)?)
}

/// Extract the first triple-backtick fenced block, tolerating an
/// optional `json` language tag. Returns `None` when there is no
/// complete fence, in which case the whole text is the candidate.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body = after_open.strip_prefix("json").unwrap_or(after_open);
    let close = body.find("```")?;
    Some(body[..close].trim())
}
