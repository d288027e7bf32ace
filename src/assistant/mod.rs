//! Assistant service integration: HTTP client behind a trait, wire
//! types, and the run orchestration loop.

pub mod client;
pub mod runner;
pub mod types;

pub use client::{AssistantApi, MockAssistantApi, OpenAiAssistantClient};
pub use runner::{run_to_completion, PollPolicy};
pub use types::{ContentPart, MessageRole, RunStatus, TextPayload, ThreadMessage};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Cannot reach assistant service at {0}")]
    Connection(String),

    #[error("Assistant service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Run timed out after {waited_ms}ms")]
    RunTimeout { waited_ms: u64 },

    #[error("Run ended without completing: {status}")]
    RunEnded { status: RunStatus },
}
