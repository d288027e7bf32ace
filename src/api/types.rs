//! Shared state for the relay API layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::assistant::{AssistantApi, OpenAiAssistantClient};
use crate::config::RelayConfig;

/// Shared context for all API routes.
///
/// `assistant` is `None` exactly when no credential is configured; the
/// analysis endpoint then serves cached results without any outbound
/// call. The client is constructed once at startup and shared, never
/// rebuilt per request.
#[derive(Clone)]
pub struct ApiContext {
    pub assistant: Option<Arc<dyn AssistantApi>>,
    pub config: Arc<RelayConfig>,
    pub started_at: DateTime<Utc>,
}

impl ApiContext {
    pub fn new(assistant: Option<Arc<dyn AssistantApi>>, config: RelayConfig) -> Self {
        Self {
            assistant,
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }

    /// Build the context from configuration, constructing the real
    /// client only when a credential is present.
    pub fn from_config(config: RelayConfig) -> Self {
        let assistant = config
            .api_key
            .as_deref()
            .map(|key| Arc::new(OpenAiAssistantClient::new(key)) as Arc<dyn AssistantApi>);
        Self::new(assistant, config)
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> RelayConfig {
        RelayConfig {
            api_key: api_key.map(str::to_string),
            assistant_id: "asst_test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }

    #[test]
    fn from_config_builds_client_when_key_present() {
        let ctx = ApiContext::from_config(config(Some("sk-test")));
        assert!(ctx.assistant.is_some());
    }

    #[test]
    fn from_config_leaves_client_out_without_key() {
        let ctx = ApiContext::from_config(config(None));
        assert!(ctx.assistant.is_none());
    }

    #[test]
    fn uptime_starts_at_zero() {
        let ctx = ApiContext::from_config(config(None));
        assert_eq!(ctx.uptime_seconds(), 0);
    }
}
