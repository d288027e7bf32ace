//! Dashboard result contract: the fixed-shape payload served on both
//! the live and the cached path, plus the key normalization that maps
//! loosely-shaped assistant replies onto it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when the assistant reply carries no status of its own.
pub const DEFAULT_STATUS_TEXT: &str = "Optimal Baseline";

// Degraded-mode copy. The dashboard renders these verbatim, so they are
// written for the user, not for the operator.
const CACHED_DIRECTIVE: &str =
    "Maintain current protocol. Live guidance will resume on the next sync.";
const CACHED_INSIGHT: &str = "Live analysis unavailable. Displaying last synced baseline.";
const CACHED_LOG_MESSAGE: &str = "Protocol engine offline. Cached baseline served.";
const CACHED_MESSAGE: &str = "Serving cached baseline result.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardStatus {
    Completed,
    Cached,
}

/// What the dashboard receives, on every path. The six core fields are
/// always present; `data`/`rawText` appear only on the live path and
/// `message`/`error` only on the cached one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResult {
    pub protocol_cached: bool,
    pub status: DashboardStatus,
    pub directive: String,
    pub insight: String,
    pub status_text: String,
    pub protocol_log_message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The four display fields lifted out of a parsed assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDirective {
    pub directive: String,
    pub insight: String,
    pub status_text: String,
    pub protocol_log_message: String,
}

/// Map a parsed reply onto the display fields. Total over any JSON
/// value: unknown shapes simply produce the defaults.
///
/// Each field takes the first listed key whose value is a string.
pub fn normalize(reply: &Value) -> NormalizedDirective {
    NormalizedDirective {
        directive: first_string(reply, &["directive", "recommendation", "summary"])
            .unwrap_or_default(),
        insight: first_string(reply, &["insight", "analysis"]).unwrap_or_default(),
        status_text: first_string(reply, &["status", "statusText"])
            .unwrap_or_else(|| DEFAULT_STATUS_TEXT.to_string()),
        protocol_log_message: first_string(reply, &["protocolLogMessage", "directive", "summary"])
            .unwrap_or_default(),
    }
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(|v| v.as_str())
        .map(str::to_string)
}

impl DashboardResult {
    /// Live-path result: the normalized fields plus the parsed reply
    /// and its raw text for clients that want to inspect them.
    pub fn completed(reply: Value, raw_text: String) -> Self {
        let fields = normalize(&reply);
        Self {
            protocol_cached: false,
            status: DashboardStatus::Completed,
            directive: fields.directive,
            insight: fields.insight,
            status_text: fields.status_text,
            protocol_log_message: fields.protocol_log_message,
            data: Some(reply),
            raw_text: Some(raw_text),
            message: None,
            error: None,
        }
    }

    /// Degraded-mode result. Deterministic apart from the diagnostic,
    /// which carries the failure's display message for operators.
    pub fn cached(diagnostic: &str) -> Self {
        Self {
            protocol_cached: true,
            status: DashboardStatus::Cached,
            directive: CACHED_DIRECTIVE.to_string(),
            insight: CACHED_INSIGHT.to_string(),
            status_text: DEFAULT_STATUS_TEXT.to_string(),
            protocol_log_message: CACHED_LOG_MESSAGE.to_string(),
            data: None,
            raw_text: None,
            message: Some(CACHED_MESSAGE.to_string()),
            error: Some(diagnostic.to_string()),
        }
    }
}
