//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Oracle auth style is not one of `bearer` / `api-key`.
    #[error("invalid oracle auth style '{value}': expected 'bearer' or 'api-key'")]
    InvalidOracleAuth { value: String },

    /// An endpoint is not an http(s) URL.
    #[error("{name} must be an http(s) URL, got '{value}'")]
    InvalidUrl { name: &'static str, value: String },

    /// At least one article per attribute is required.
    #[error("max articles per attribute must be at least 1, got {value}")]
    InvalidMaxArticles { value: usize },
}
