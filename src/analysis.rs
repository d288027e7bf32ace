//! Analysis pipeline: briefing composition through dashboard result,
//! wrapped in the fallback policy.
//!
//! Every failure inside the pipeline converges here: the caller always
//! receives a well-formed [`DashboardResult`], cached when anything
//! went wrong, never an error.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::assistant::{run_to_completion, AssistantApi, AssistantError, PollPolicy};
use crate::briefing;
use crate::dashboard::DashboardResult;
use crate::reply::{self, ReplyError, MESSAGE_LOOKBACK};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

/// Run the full analysis pipeline. Infallible by contract: any internal
/// failure is logged and converted into the cached result, carrying the
/// failure's display message as the diagnostic.
///
/// `api` is `None` exactly when no credential is configured, which
/// short-circuits to the cached result without any outbound call.
pub async fn run_analysis(
    api: Option<&dyn AssistantApi>,
    assistant_id: &str,
    user_data: &Value,
    policy: PollPolicy,
) -> DashboardResult {
    match try_analysis(api, assistant_id, user_data, policy).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "Analysis failed, serving cached result");
            DashboardResult::cached(&e.to_string())
        }
    }
}

async fn try_analysis(
    api: Option<&dyn AssistantApi>,
    assistant_id: &str,
    user_data: &Value,
    policy: PollPolicy,
) -> Result<DashboardResult, AnalysisError> {
    let api = api.ok_or(AnalysisError::MissingApiKey)?;

    // Step 1: Compose the text briefing from the raw user data
    let briefing = briefing::compose(user_data);

    // Step 2: Drive an assistant run over the briefing to completion
    let thread_id = run_to_completion(api, assistant_id, &briefing, policy).await?;

    // Step 3: Pull the newest assistant reply out of the thread
    let messages = api.recent_messages(&thread_id, MESSAGE_LOOKBACK).await?;
    let raw_text = reply::extract_reply_text(&messages)?;

    // Step 4: Parse the reply and assemble the dashboard result
    let parsed = reply::parse_directive(&raw_text)?;
    info!(thread_id = %thread_id, "Analysis completed");
    Ok(DashboardResult::completed(parsed, raw_text))
}
