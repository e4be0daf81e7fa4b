use thiserror::Error;

/// Failures talking to a scoring oracle.
///
/// Both variants are recoverable: scorers log them and fall back to neutral scores.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    /// Network failure or non-success HTTP status.
    #[error("oracle unavailable: {reason}")]
    Unavailable { reason: String },

    /// Response envelope could not be decoded or had no message content.
    #[error("oracle response malformed: {reason}")]
    Malformed { reason: String },
}

impl OracleError {
    pub fn unavailable(reason: impl ToString) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn malformed(reason: impl ToString) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
        }
    }
}

/// Oracle text that did not match the shape a call site expected.
#[derive(Debug, Error)]
pub enum ScoreParseError {
    /// Text is not a bare finite number.
    #[error("not a numeric score: {raw:?}")]
    NotANumber { raw: String },

    /// Text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// JSON parsed but is not an object.
    #[error("expected a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// No `{...}` span found in free-form text.
    #[error("no JSON object found in output")]
    NoJsonObject,
}
