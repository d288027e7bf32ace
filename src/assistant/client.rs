//! HTTP client for the assistant service, behind a trait so the
//! pipeline can run against a scripted double in tests.
//!
//! Call surface (assistants API v2): create-thread, create-message,
//! create-run, retrieve-run, list-messages. Authentication is a bearer
//! credential; every request also carries the `OpenAI-Beta` header the
//! v2 surface requires.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{ContentPart, MessageRole, RunStatus, ThreadMessage};
use super::AssistantError;

/// Production endpoint of the assistant service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request timeout. The run-level wait bound lives in
/// `runner::PollPolicy`, not here.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Operations the pipeline needs from the assistant service.
///
/// Object-safe so the HTTP state can hold `Option<Arc<dyn AssistantApi>>`
/// and tests can substitute [`MockAssistantApi`].
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create a fresh conversation thread; returns its id.
    async fn create_thread(&self) -> Result<String, AssistantError>;

    /// Post `text` as a user message on the thread.
    async fn add_user_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError>;

    /// Start a run of `assistant_id` against the thread; returns the run id.
    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<String, AssistantError>;

    /// Read the current status of a run.
    async fn run_status(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<RunStatus, AssistantError>;

    /// List the thread's messages newest-first, at most `limit` of them.
    async fn recent_messages(
        &self,
        thread_id: &str,
        limit: u8,
    ) -> Result<Vec<ThreadMessage>, AssistantError>;
}

// ═══════════════════════════════════════════════════════════
// Production client
// ═══════════════════════════════════════════════════════════

/// Assistant service client over reqwest.
pub struct OpenAiAssistantClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiAssistantClient {
    /// Create a client for the production endpoint.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a specific endpoint. Tests point this at
    /// a local stub server.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    fn map_transport_error(&self, e: reqwest::Error) -> AssistantError {
        if e.is_connect() {
            AssistantError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            AssistantError::Http(format!("Request timed out after {HTTP_TIMEOUT_SECS}s"))
        } else {
            AssistantError::Http(e.to_string())
        }
    }

    /// Send a request, mapping transport and non-2xx failures, and parse
    /// the response body as `T`.
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, AssistantError> {
        let response = self.checked(req).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AssistantError::ResponseParsing(e.to_string()))
    }

    /// Send a request and map failures, discarding the response body.
    async fn send_ok(&self, req: reqwest::RequestBuilder) -> Result<(), AssistantError> {
        self.checked(req).await.map(|_| ())
    }

    async fn checked(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AssistantError> {
        let response = req
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Response body carrying just the created object's id.
#[derive(Deserialize)]
struct ObjectRef {
    id: String,
}

/// Response body from retrieve-run; only the status is read.
#[derive(Deserialize)]
struct RunSnapshot {
    status: RunStatus,
}

/// Response body from list-messages.
#[derive(Deserialize)]
struct MessageListing {
    data: Vec<ThreadMessage>,
}

/// Request body for create-message.
#[derive(Serialize)]
struct NewMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for create-run.
#[derive(Serialize)]
struct NewRun<'a> {
    assistant_id: &'a str,
}

#[async_trait]
impl AssistantApi for OpenAiAssistantClient {
    async fn create_thread(&self) -> Result<String, AssistantError> {
        let req = self
            .request(reqwest::Method::POST, "/threads")
            .json(&serde_json::json!({}));
        let created: ObjectRef = self.send_json(req).await?;
        Ok(created.id)
    }

    async fn add_user_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError> {
        let req = self
            .request(reqwest::Method::POST, &format!("/threads/{thread_id}/messages"))
            .json(&NewMessage {
                role: "user",
                content: text,
            });
        self.send_ok(req).await
    }

    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<String, AssistantError> {
        let req = self
            .request(reqwest::Method::POST, &format!("/threads/{thread_id}/runs"))
            .json(&NewRun { assistant_id });
        let created: ObjectRef = self.send_json(req).await?;
        Ok(created.id)
    }

    async fn run_status(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<RunStatus, AssistantError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/threads/{thread_id}/runs/{run_id}"),
        );
        let snapshot: RunSnapshot = self.send_json(req).await?;
        Ok(snapshot.status)
    }

    async fn recent_messages(
        &self,
        thread_id: &str,
        limit: u8,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        let req = self
            .request(reqwest::Method::GET, &format!("/threads/{thread_id}/messages"))
            .query(&[("order", "desc".to_string()), ("limit", limit.to_string())]);
        let listing: MessageListing = self.send_json(req).await?;
        Ok(listing.data)
    }
}

// ═══════════════════════════════════════════════════════════
// Scripted mock
// ═══════════════════════════════════════════════════════════

/// Mock assistant client for testing. Completes immediately with a
/// configurable reply, or walks a scripted status sequence.
pub struct MockAssistantApi {
    reply: String,
    statuses: Mutex<Vec<RunStatus>>,
    messages: Mutex<Option<Vec<ThreadMessage>>>,
    calls: AtomicUsize,
}

impl MockAssistantApi {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            statuses: Mutex::new(vec![RunStatus::Completed]),
            messages: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Script the status sequence returned by successive `run_status`
    /// reads. The last entry repeats once the script is exhausted, so a
    /// single `InProgress` simulates a run that never finishes.
    pub fn with_statuses(mut self, statuses: Vec<RunStatus>) -> Self {
        self.statuses = Mutex::new(statuses);
        self
    }

    /// Replace the thread listing returned by `recent_messages`.
    pub fn with_messages(mut self, messages: Vec<ThreadMessage>) -> Self {
        self.messages = Mutex::new(Some(messages));
        self
    }

    /// Total number of API calls made against this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssistantApi for MockAssistantApi {
    async fn create_thread(&self) -> Result<String, AssistantError> {
        self.record_call();
        Ok(format!("thread_{}", Uuid::new_v4().simple()))
    }

    async fn add_user_message(
        &self,
        _thread_id: &str,
        _text: &str,
    ) -> Result<(), AssistantError> {
        self.record_call();
        Ok(())
    }

    async fn start_run(
        &self,
        _thread_id: &str,
        _assistant_id: &str,
    ) -> Result<String, AssistantError> {
        self.record_call();
        Ok(format!("run_{}", Uuid::new_v4().simple()))
    }

    async fn run_status(
        &self,
        _thread_id: &str,
        _run_id: &str,
    ) -> Result<RunStatus, AssistantError> {
        self.record_call();
        let mut statuses = self.statuses.lock().expect("statuses lock");
        let status = if statuses.len() > 1 {
            statuses.remove(0)
        } else {
            statuses.first().copied().unwrap_or(RunStatus::Completed)
        };
        Ok(status)
    }

    async fn recent_messages(
        &self,
        _thread_id: &str,
        _limit: u8,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        self.record_call();
        if let Some(custom) = self.messages.lock().expect("messages lock").as_ref() {
            return Ok(custom.clone());
        }
        Ok(vec![ThreadMessage {
            id: format!("msg_{}", Uuid::new_v4().simple()),
            role: MessageRole::Assistant,
            content: vec![ContentPart::text(&self.reply)],
        }])
    }
}
