//! Pulls the JSON object out of a raw completion.
//!
//! The model is told to answer with a single JSON object, but it often adds
//! a greeting, a markdown fence, or a sign-off. Everything outside the first
//! `{` and the last `}` is dropped. Brace balance is not checked, so two
//! sibling objects or a stray brace in the surrounding prose end up as
//! [`ExtractionError::Malformed`].

use serde_json::{Map, Value};

use crate::error::ExtractionError;

/// Inclusive slice from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Result<&str, ExtractionError> {
    let start = raw.find('{').ok_or(ExtractionError::NoDelimiters)?;
    let end = raw.rfind('}').ok_or(ExtractionError::NoDelimiters)?;
    if end < start {
        return Err(ExtractionError::Malformed(
            "closing brace precedes opening brace".to_string(),
        ));
    }
    Ok(&raw[start..=end])
}

/// Extract and parse the completion into a JSON object.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let candidate = extract_json(raw)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExtractionError::Malformed(format!(
            "expected an object, found {other}"
        ))),
        Err(e) => Err(ExtractionError::Malformed(e.to_string())),
    }
}
