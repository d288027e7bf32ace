//! Run orchestration: one thread, one run, fixed-interval polling.

use std::time::{Duration, Instant};

use super::client::AssistantApi;
use super::types::RunStatus;
use super::AssistantError;

/// Fixed delay between run status reads.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_500;

/// Upper bound on the whole wait for a terminal status.
pub const DEFAULT_MAX_WAIT_MS: u64 = 120_000;

/// Polling cadence for [`run_to_completion`]. No backoff: the interval
/// stays fixed for the whole wait. Tests shrink both values to
/// milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_millis(DEFAULT_MAX_WAIT_MS),
        }
    }
}

/// Drive one full request cycle: create a thread, post the briefing as a
/// user message, start a run, and poll until the run completes.
///
/// Returns the thread id so the caller can read the reply off it. The
/// thread and run are not cleaned up afterwards; the service's own
/// retention policy owns them. There is no cancellation path, so the
/// only exits are a terminal status or the `max_wait` bound.
pub async fn run_to_completion(
    api: &dyn AssistantApi,
    assistant_id: &str,
    briefing: &str,
    policy: PollPolicy,
) -> Result<String, AssistantError> {
    // Step 1: Fresh thread per request; threads are never reused.
    let thread_id = api.create_thread().await?;

    // Step 2: The briefing is the sole user message on the thread.
    api.add_user_message(&thread_id, briefing).await?;

    // Step 3: Start the run.
    let run_id = api.start_run(&thread_id, assistant_id).await?;
    tracing::info!(thread_id = %thread_id, run_id = %run_id, "Run started");

    // Step 4: Poll at a fixed interval until terminal status or deadline.
    let started = Instant::now();
    loop {
        if started.elapsed() >= policy.max_wait {
            let waited_ms = started.elapsed().as_millis() as u64;
            tracing::warn!(thread_id = %thread_id, waited_ms, "Run polling hit the wait bound");
            return Err(AssistantError::RunTimeout { waited_ms });
        }

        let status = api.run_status(&thread_id, &run_id).await?;
        match status {
            RunStatus::Completed => {
                tracing::info!(
                    thread_id = %thread_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Run completed"
                );
                return Ok(thread_id);
            }
            _ if status.is_terminal() => {
                tracing::warn!(thread_id = %thread_id, status = %status, "Run ended abnormally");
                return Err(AssistantError::RunEnded { status });
            }
            _ => {
                tracing::debug!(thread_id = %thread_id, status = %status, "Run not finished yet");
            }
        }

        tokio::time::sleep(policy.interval).await;
    }
}
