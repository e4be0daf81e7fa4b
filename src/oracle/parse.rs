//! Typed parsers for oracle output.
//!
//! These only decide whether text has the expected shape. Range policy (zero vs clamp) is
//! applied by the scorers.

use serde_json::Value;

use super::error::ScoreParseError;

/// Parses a bare numeric score such as `"3.7"` or `" 4\n"`.
pub fn parse_scalar_score(text: &str) -> Result<f64, ScoreParseError> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScoreParseError::NotANumber {
            raw: trimmed.to_string(),
        })
}

/// Parses a JSON object of `key -> score`.
///
/// Each value is coerced with [`coerce_score`]; non-numeric values come back as `None` so the
/// caller can apply its own fallback.
pub fn parse_score_map(text: &str) -> Result<Vec<(String, Option<f64>)>, ScoreParseError> {
    let value: Value = serde_json::from_str(text.trim())?;
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| {
                let score = coerce_score(&value);
                (key, score)
            })
            .collect()),
        other => Err(ScoreParseError::NotAnObject {
            kind: json_kind(&other),
        }),
    }
}

/// Returns the span from the first `{` to the last `}` of free-form model output.
pub fn extract_json_object(text: &str) -> Result<&str, ScoreParseError> {
    let start = text.find('{').ok_or(ScoreParseError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ScoreParseError::NoJsonObject)?;
    if end < start {
        return Err(ScoreParseError::NoJsonObject);
    }
    Ok(&text[start..=end])
}

/// Coerces a JSON number or numeric string to a finite `f64`.
pub fn coerce_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Extracts `choices[0].message.content` from a chat-completions envelope.
pub fn message_content(envelope: &Value) -> Option<&str> {
    envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
