//! Extraction of the structured payload the intake model is asked to emit.
//!
//! The model does not reliably answer with bare JSON: it wraps it in code
//! fences, chats around it, or skips it entirely. Every one of those cases
//! yields a usable [`ParsedPayload`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::user_info::RawUserInfo;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStatus {
    #[default]
    Collecting,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub status: PayloadStatus,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub collected_fields: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub missing_fields: Vec<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub user_info: Option<RawUserInfo>,
    /// Keys the model added beyond the expected shape.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParsedPayload {
    /// Plain conversational turn with no structured data.
    pub fn prose(text: &str) -> Self {
        Self {
            status: PayloadStatus::Collecting,
            response: Some(text.to_string()),
            collected_fields: Vec::new(),
            missing_fields: Vec::new(),
            user_info: None,
            extra: Map::new(),
        }
    }
}

/// Read a known key, replacing `null` or a value of the wrong type with the
/// field's default so one bad key never discards the rest of the object.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        debug!(error = %e, "ignoring malformed payload key");
        T::default()
    }))
}

/// Locate the JSON candidate inside raw model output.
fn extract_json_candidate(text: &str) -> Option<&str> {
    if let Some(start) = text.find(JSON_FENCE) {
        let body = &text[start + JSON_FENCE.len()..];
        let end = body.find(FENCE).unwrap_or(body.len());
        return Some(body[..end].trim());
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    }
}

/// Turn raw model output into a payload. Never fails.
pub fn parse_model_output(text: &str) -> ParsedPayload {
    let Some(candidate) = extract_json_candidate(text) else {
        return ParsedPayload::prose(text);
    };

    let value = match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            debug!(kind = %json_kind(&other), "model output JSON is not an object");
            return ParsedPayload::prose(text);
        }
        Err(e) => {
            debug!(error = %e, "model output is not valid JSON, treating as prose");
            return ParsedPayload::prose(text);
        }
    };

    match serde_json::from_value::<ParsedPayload>(value) {
        Ok(payload) => payload,
        Err(e) => {
            debug!(error = %e, "model output JSON has an unexpected shape");
            ParsedPayload::prose(text)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
