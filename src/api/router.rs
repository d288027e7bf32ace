//! Relay API router.
//!
//! Returns a composable `Router` that can be mounted on any axum
//! server. Routes are nested under `/api/`.

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the relay router.
///
/// The dashboard calls these endpoints cross-origin, so every response
/// carries permissive CORS headers. Headers are set directly rather
/// than through a preflight-aware middleware, which keeps the explicit
/// `OPTIONS` handler in charge of preflight responses.
pub fn relay_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route(
            "/analysis",
            post(endpoints::analysis::run).options(endpoints::analysis::preflight),
        )
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::assistant::{AssistantApi, MockAssistantApi};
    use crate::config::RelayConfig;

    fn test_ctx(assistant: Option<Arc<dyn AssistantApi>>) -> ApiContext {
        let config = RelayConfig {
            api_key: assistant.as_ref().map(|_| "sk-test".to_string()),
            assistant_id: "asst_test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        };
        ApiContext::new(assistant, config)
    }

    fn mock_ctx(reply: &str) -> ApiContext {
        test_ctx(Some(Arc::new(MockAssistantApi::new(reply))))
    }

    fn post_analysis(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analysis")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn malformed_body_returns_400() {
        let app = relay_router(mock_ctx("{}"));

        let response = app.oneshot(post_analysis("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Malformed JSON body"));
    }

    #[tokio::test]
    async fn analysis_completes_with_configured_assistant() {
        let app = relay_router(mock_ctx("```json\n{\"directive\":\"Rest today\"}\n```"));

        let body = json!({"biometrics": {"hrv": 48}}).to_string();
        let response = app.oneshot(post_analysis(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["protocolCached"], json!(false));
        assert_eq!(json["status"], "completed");
        assert_eq!(json["directive"], "Rest today");
        assert!(json.get("data").is_some());
        assert!(json.get("rawText").is_some());
    }

    #[tokio::test]
    async fn analysis_serves_cached_without_credential() {
        let app = relay_router(test_ctx(None));

        let response = app.oneshot(post_analysis("{}")).await.unwrap();
        // Degraded mode is still a successful response
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["protocolCached"], json!(true));
        assert_eq!(json["status"], "cached");
        assert_eq!(json["error"], "OPENAI_API_KEY not set");
    }

    #[tokio::test]
    async fn options_analysis_returns_204() {
        let app = relay_router(test_ctx(None));

        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/analysis")
            .header("Origin", "https://dashboard.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, POST, OPTIONS"
        );
    }

    #[tokio::test]
    async fn cross_origin_responses_allow_any_origin() {
        let app = relay_router(test_ctx(None));

        let req = Request::builder()
            .method("GET")
            .uri("/api/health")
            .header("Origin", "https://dashboard.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn get_analysis_is_method_not_allowed() {
        let app = relay_router(test_ctx(None));

        let req = Request::builder()
            .method("GET")
            .uri("/api/analysis")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = relay_router(test_ctx(None));

        let req = Request::builder()
            .method("GET")
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_response_shape() {
        let app = relay_router(mock_ctx("{}"));

        let req = Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(!json["version"].as_str().unwrap().is_empty());
        assert_eq!(json["assistant_configured"], json!(true));
        assert!(json["uptime_seconds"].is_number());
    }

    #[tokio::test]
    async fn health_reports_missing_assistant() {
        let app = relay_router(test_ctx(None));

        let req = Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        let json = response_json(response).await;
        assert_eq!(json["assistant_configured"], json!(false));
    }
}
