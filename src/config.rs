//! Process configuration: environment surface and compiled defaults.
//!
//! The relay deliberately keeps this surface tiny: one secret, one
//! assistant id, one bind address. Polling cadence is a code-level
//! default (`assistant::PollPolicy`), not an environment knob.

use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Baseline Relay";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Assistant targeted when `BASELINE_ASSISTANT_ID` is not set.
pub const DEFAULT_ASSISTANT_ID: &str = "asst_baseline_protocol";

/// Bind address used when `BASELINE_BIND` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "info,baseline_relay=debug".to_string()
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bearer credential for the assistant service. `None` when the
    /// variable is unset or blank; the pipeline then serves the cached
    /// fallback without attempting any outbound call.
    pub api_key: Option<String>,
    /// Target assistant identifier.
    pub assistant_id: String,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
}

impl RelayConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("OPENAI_API_KEY").ok(),
            env::var("BASELINE_ASSISTANT_ID").ok(),
            env::var("BASELINE_BIND").ok(),
        )
    }

    fn from_values(
        api_key: Option<String>,
        assistant_id: Option<String>,
        bind_addr: Option<String>,
    ) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            assistant_id: assistant_id
                .unwrap_or_else(|| DEFAULT_ASSISTANT_ID.to_string()),
            bind_addr: bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}
