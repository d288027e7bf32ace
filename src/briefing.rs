//! Briefing composition: renders loosely-shaped user data into the
//! text block posted to the assistant.
//!
//! Total over any input: every JSON value maps to some string, so the
//! analysis pipeline never fails before the first outbound call.

use serde_json::Value;

/// Returned when the input is not a JSON object at all.
pub const NO_DATA_PLACEHOLDER: &str = "No data provided.";

/// Keys accepted for the labs section, in precedence order. The first
/// non-null value wins; later keys are not consulted.
const LAB_KEYS: &[&str] = &["clinical_markers", "clinical_audit", "labs"];

/// Render user data as the assistant briefing.
///
/// Recognized fields become titled sections in a fixed order
/// (biometrics, labs, calendar). When none of them is present the whole
/// object is pretty-printed instead, so the assistant still sees
/// whatever the client sent.
pub fn compose(user_data: &Value) -> String {
    let Some(fields) = user_data.as_object() else {
        return NO_DATA_PLACEHOLDER.to_string();
    };

    let mut sections: Vec<String> = Vec::new();

    if let Some(biometrics) = fields.get("biometrics").filter(|v| v.is_object()) {
        sections.push(titled_section("## Biometrics", biometrics));
    }

    let labs = LAB_KEYS
        .iter()
        .find_map(|key| fields.get(*key).filter(|v| !v.is_null()));
    if let Some(labs) = labs {
        sections.push(titled_section("## Labs / Clinical", labs));
    }

    let calendar = fields
        .get("calendar")
        .filter(|v| v.is_array() || v.is_object());
    if let Some(calendar) = calendar {
        sections.push(titled_section("## Calendar", calendar));
    }

    if sections.is_empty() {
        return pretty(user_data);
    }

    sections.join("\n\n")
}

fn titled_section(title: &str, value: &Value) -> String {
    format!("{title}\n{}", pretty(value))
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
