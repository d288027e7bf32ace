//! One-shot admin tool that keeps the assistant's instructions ending
//! with the JSON response-format appendix the relay depends on.
//!
//! Fetches the assistant record, checks for the appendix marker, and
//! updates the instructions when it is missing. Safe to run repeatedly.
//!
//! Usage: `OPENAI_API_KEY=sk-... cargo run --bin sync_assistant_instructions`

use serde::Deserialize;

use baseline_relay::assistant::client::DEFAULT_BASE_URL;
use baseline_relay::config::RelayConfig;

/// First line of the appendix; its presence means the instructions are
/// already synced.
const APPENDIX_MARKER: &str = "RESPONSE FORMAT (JSON only)";

const INSTRUCTIONS_APPENDIX: &str = r#"RESPONSE FORMAT (JSON only)
Reply with a single JSON object and nothing else, using these keys:
- "directive": the one action to take next
- "insight": the reasoning behind the directive
- "status": a short headline for the current state
- "protocolLogMessage": a one-line entry for the protocol log
Do not wrap the JSON in a markdown code fence."#;

fn needs_appendix(instructions: Option<&str>) -> bool {
    !instructions.unwrap_or_default().contains(APPENDIX_MARKER)
}

fn with_appendix(instructions: Option<&str>) -> String {
    let current = instructions.unwrap_or_default().trim_end();
    if current.is_empty() {
        INSTRUCTIONS_APPENDIX.to_string()
    } else {
        format!("{current}\n\n{INSTRUCTIONS_APPENDIX}")
    }
}

/// Assistant record; only the instructions are read.
#[derive(Deserialize)]
struct AssistantRecord {
    instructions: Option<String>,
}

#[tokio::main]
async fn main() {
    let config = RelayConfig::from_env();
    let Some(api_key) = config.api_key else {
        eprintln!("OPENAI_API_KEY not set");
        std::process::exit(2);
    };

    if let Err(e) = run(&api_key, &config.assistant_id).await {
        eprintln!("Sync failed: {e}");
        std::process::exit(1);
    }
}

async fn run(api_key: &str, assistant_id: &str) -> Result<(), String> {
    let client = reqwest::Client::new();
    let url = format!("{DEFAULT_BASE_URL}/assistants/{assistant_id}");

    let record: AssistantRecord = checked(
        client
            .get(&url)
            .bearer_auth(api_key)
            .header("OpenAI-Beta", "assistants=v2"),
    )
    .await?
    .json()
    .await
    .map_err(|e| format!("Malformed assistant record: {e}"))?;

    if !needs_appendix(record.instructions.as_deref()) {
        println!("Assistant {assistant_id} already carries the response-format appendix");
        return Ok(());
    }

    let updated = with_appendix(record.instructions.as_deref());
    checked(
        client
            .post(&url)
            .bearer_auth(api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .json(&serde_json::json!({ "instructions": updated })),
    )
    .await?;

    println!("Assistant {assistant_id} instructions updated");
    Ok(())
}

async fn checked(req: reqwest::RequestBuilder) -> Result<reqwest::Response, String> {
    let response = req.send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("HTTP {status}: {body}"));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_instructions_need_the_appendix() {
        assert!(needs_appendix(None));
        assert!(needs_appendix(Some("")));
        assert!(needs_appendix(Some("You are a health coach.")));
    }

    #[test]
    fn synced_instructions_are_left_alone() {
        let synced = with_appendix(Some("You are a health coach."));
        assert!(!needs_appendix(Some(&synced)));
    }

    #[test]
    fn appendix_lands_after_existing_text() {
        let updated = with_appendix(Some("You are a health coach.\n"));
        assert!(updated.starts_with("You are a health coach."));
        assert!(updated.contains(APPENDIX_MARKER));
        assert!(updated.contains("protocolLogMessage"));
    }

    #[test]
    fn empty_instructions_become_just_the_appendix() {
        assert_eq!(with_appendix(None), INSTRUCTIONS_APPENDIX);
        assert_eq!(with_appendix(Some("   ")), INSTRUCTIONS_APPENDIX);
    }
}
