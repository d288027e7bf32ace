//! Relay server lifecycle — binds the listener and serves the router
//! until shutdown.

use thiserror::Error;
use tracing::info;

use crate::api::router::relay_router;
use crate::api::types::ApiContext;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Bind `bind_addr` and serve the relay API until the process receives
/// Ctrl-C.
pub async fn serve(ctx: ApiContext, bind_addr: &str) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: bind_addr.to_string(),
            source: e,
        })?;

    let addr = listener.local_addr()?;
    info!(%addr, "Relay server listening");

    let app = relay_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::sync::oneshot;

    use super::*;
    use crate::assistant::{AssistantApi, OpenAiAssistantClient};
    use crate::config::RelayConfig;

    fn test_config(api_key: Option<&str>) -> RelayConfig {
        RelayConfig {
            api_key: api_key.map(str::to_string),
            assistant_id: "asst_test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }

    /// Serve the relay on an ephemeral port; the returned sender stops it.
    async fn spawn_relay(ctx: ApiContext) -> (SocketAddr, oneshot::Sender<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = relay_router(ctx);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        (addr, shutdown_tx)
    }

    /// Assistant service stub whose run completes on the first poll.
    fn assistant_stub() -> Router {
        async fn create_thread() -> Json<serde_json::Value> {
            Json(json!({"id": "thread_1"}))
        }
        async fn create_message() -> Json<serde_json::Value> {
            Json(json!({"id": "msg_user"}))
        }
        async fn create_run() -> Json<serde_json::Value> {
            Json(json!({"id": "run_1", "status": "queued"}))
        }
        async fn get_run() -> Json<serde_json::Value> {
            Json(json!({"id": "run_1", "status": "completed"}))
        }
        async fn list_messages() -> Json<serde_json::Value> {
            Json(json!({
                "data": [{
                    "id": "msg_reply",
                    "role": "assistant",
                    "content": [{
                        "type": "text",
                        "text": {"value": "```json\n{\"directive\":\"Rest today\"}\n```"}
                    }]
                }]
            }))
        }

        Router::new()
            .route("/threads", post(create_thread))
            .route("/threads/:id/messages", post(create_message).get(list_messages))
            .route("/threads/:id/runs", post(create_run))
            .route("/threads/:id/runs/:run", get(get_run))
    }

    #[tokio::test]
    async fn health_over_http() {
        let ctx = ApiContext::new(None, test_config(None));
        let (addr, shutdown) = spawn_relay(ctx).await;

        let resp = reqwest::get(format!("http://{addr}/api/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["assistant_configured"], json!(false));

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn analysis_serves_cached_over_http() {
        let ctx = ApiContext::new(None, test_config(None));
        let (addr, shutdown) = spawn_relay(ctx).await;

        let resp = reqwest::Client::new()
            .post(format!("http://{addr}/api/analysis"))
            .json(&json!({"biometrics": {"hrv": 48}}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["protocolCached"], json!(true));
        assert_eq!(body["error"], "OPENAI_API_KEY not set");

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn end_to_end_against_stub_assistant() {
        // Stand-in for the assistant service
        let stub_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let stub_addr = stub_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(stub_listener, assistant_stub()).await.unwrap();
        });

        let client: Arc<dyn AssistantApi> = Arc::new(OpenAiAssistantClient::with_base_url(
            "sk-test",
            &format!("http://{stub_addr}"),
        ));
        let ctx = ApiContext::new(Some(client), test_config(Some("sk-test")));
        let (addr, shutdown) = spawn_relay(ctx).await;

        let resp = reqwest::Client::new()
            .post(format!("http://{addr}/api/analysis"))
            .json(&json!({"biometrics": {"hrv": 48}, "calendar": []}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["protocolCached"], json!(false));
        assert_eq!(body["status"], "completed");
        assert_eq!(body["directive"], "Rest today");
        assert_eq!(body["data"], json!({"directive": "Rest today"}));

        let _ = shutdown.send(());
    }

    #[tokio::test]
    async fn bind_failure_reports_address() {
        let ctx = ApiContext::new(None, test_config(None));
        let err = serve(ctx, "definitely-not-an-address").await.unwrap_err();
        assert!(err.to_string().contains("definitely-not-an-address"));
    }
}
