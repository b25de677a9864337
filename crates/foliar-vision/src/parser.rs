//! Reply parser and mapper.
//!
//! Turns the provider's free-text reply into a complete
//! [`AnalysisResult`]. Mapping is infallible by design: a reply the model
//! formatted badly is a *degraded success*, not an error — the upstream
//! call itself succeeded, so the service still answers 200 and keeps the
//! raw text in the description instead of discarding it.

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use foliar_core::{defaults, AnalysisResult, Confidence, DiagnosisRaw, Severity};

/// Shape we ask the model for. Everything optional; absence is handled
/// with defined fallbacks rather than surfacing null.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    disease_name: Option<String>,
    confidence: Option<String>,
    description: Option<String>,
    symptoms: Option<serde_json::Value>,
    treatment: Option<serde_json::Value>,
    prevention: Option<serde_json::Value>,
    severity: Option<String>,
}

/// Map a raw reply onto the canonical result.
///
/// `timestamp` and `model_used` are always populated here from this
/// service's clock and the provider's reported model, never from the reply
/// body.
pub fn map_reply(raw: &DiagnosisRaw) -> AnalysisResult {
    let timestamp = Utc::now().to_rfc3339();

    match extract_json(&raw.text).and_then(|json| serde_json::from_str::<RawAnalysis>(json).ok()) {
        Some(parsed) => AnalysisResult {
            disease_name: parsed
                .disease_name
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| defaults::FALLBACK_DISEASE_NAME.to_string()),
            confidence: parsed
                .confidence
                .map(|s| Confidence::parse(&s))
                .unwrap_or_default(),
            description: parsed
                .description
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| raw.text.trim().to_string()),
            symptoms: coerce_list(parsed.symptoms, defaults::FALLBACK_SYMPTOM),
            treatment: coerce_list(parsed.treatment, defaults::FALLBACK_TREATMENT),
            prevention: coerce_list(parsed.prevention, defaults::FALLBACK_PREVENTION),
            severity: parsed
                .severity
                .map(|s| Severity::parse(&s))
                .unwrap_or_default(),
            timestamp,
            model_used: raw.model.clone(),
        },
        None => {
            warn!(
                reply_len = raw.text.len(),
                "Model reply was not parseable JSON, returning degraded result"
            );
            AnalysisResult {
                disease_name: defaults::FALLBACK_DISEASE_NAME.to_string(),
                confidence: Confidence::Low,
                description: format!(
                    "{}{}",
                    defaults::FALLBACK_DESCRIPTION_PREFIX,
                    raw.text.trim()
                ),
                symptoms: vec![defaults::FALLBACK_SYMPTOM.to_string()],
                treatment: vec![defaults::FALLBACK_TREATMENT.to_string()],
                prevention: vec![defaults::FALLBACK_PREVENTION.to_string()],
                severity: Severity::default(),
                timestamp,
                model_used: raw.model.clone(),
            }
        }
    }
}

/// Locate the JSON object inside a reply, tolerating markdown code fences
/// and prose around it. Returns the outermost `{ ... }` span.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Coerce a list-typed field to an ordered list of strings.
///
/// Accepts a JSON array (non-string items are stringified) or a single
/// semicolon-separated string, which some models emit for list fields. An
/// absent or empty list gets the given fallback entry so the field is
/// never empty on the wire.
fn coerce_list(value: Option<serde_json::Value>, fallback: &str) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(serde_json::Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(serde_json::Value::String(s)) => s
            .split(';')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    if items.is_empty() {
        vec![fallback.to_string()]
    } else {
        items
    }
}
