//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FACTCHECK_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;

use crate::constants::DEFAULT_MAX_ARTICLES;

/// How the oracle API key is presented to the chat-completions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleAuth {
    /// `Authorization: Bearer <key>` (OpenAI and most compatible servers).
    #[default]
    Bearer,
    /// `api-key: <key>` (Azure OpenAI deployments).
    ApiKeyHeader,
}

impl std::str::FromStr for OracleAuth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bearer" | "openai" => Ok(Self::Bearer),
            "api-key" | "api_key" | "azure" => Ok(Self::ApiKeyHeader),
            _ => Err(format!("unknown oracle auth style: {}", s)),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FACTCHECK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5001`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Origin allowed by CORS. Default: `http://localhost:3000`.
    pub cors_origin: String,

    /// Chat-completions endpoint used as the scoring oracle.
    pub oracle_url: String,

    /// API key for the oracle endpoint.
    pub oracle_api_key: Option<String>,

    /// Header style for `oracle_api_key`. Default: bearer.
    pub oracle_auth: OracleAuth,

    /// Model name sent in oracle requests. Default: `gpt-4o-mini`.
    pub oracle_model: String,

    /// Model used by the default summary generator. Default: `gpt-4o-mini`.
    pub generator_model: String,

    /// Bing Web Search subscription key.
    pub bing_api_key: Option<String>,

    /// Bing Web Search endpoint.
    pub bing_url: String,

    /// Google Programmable Search API key.
    pub google_api_key: Option<String>,

    /// Google Programmable Search engine id (`cx`).
    pub google_cx: Option<String>,

    /// Hugging Face token used for registry-loaded models.
    pub hf_token: Option<String>,

    /// Extracted articles kept per attribute. Default: `5`.
    pub max_articles: usize,

    /// Caps disabled-evaluation default scores at 5.0. Default: `false`.
    pub cap_default_scores: bool,
}

/// Default oracle endpoint used when `FACTCHECK_ORACLE_URL` is not set.
pub const DEFAULT_ORACLE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default Bing endpoint used when `FACTCHECK_BING_URL` is not set.
pub const DEFAULT_BING_URL: &str = "https://api.bing.microsoft.com/v7.0/search";

/// Default model for oracle and summary requests.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5001,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            cors_origin: "http://localhost:3000".to_string(),
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            oracle_api_key: None,
            oracle_auth: OracleAuth::default(),
            oracle_model: DEFAULT_MODEL.to_string(),
            generator_model: DEFAULT_MODEL.to_string(),
            bing_api_key: None,
            bing_url: DEFAULT_BING_URL.to_string(),
            google_api_key: None,
            google_cx: None,
            hf_token: None,
            max_articles: DEFAULT_MAX_ARTICLES,
            cap_default_scores: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "FACTCHECK_PORT";
    const ENV_BIND_ADDR: &'static str = "FACTCHECK_BIND_ADDR";
    const ENV_CORS_ORIGIN: &'static str = "FACTCHECK_CORS_ORIGIN";
    const ENV_ORACLE_URL: &'static str = "FACTCHECK_ORACLE_URL";
    const ENV_ORACLE_API_KEY: &'static str = "FACTCHECK_ORACLE_API_KEY";
    const ENV_ORACLE_AUTH: &'static str = "FACTCHECK_ORACLE_AUTH";
    const ENV_ORACLE_MODEL: &'static str = "FACTCHECK_ORACLE_MODEL";
    const ENV_GENERATOR_MODEL: &'static str = "FACTCHECK_GENERATOR_MODEL";
    const ENV_BING_API_KEY: &'static str = "FACTCHECK_BING_API_KEY";
    const ENV_BING_URL: &'static str = "FACTCHECK_BING_URL";
    const ENV_GOOGLE_API_KEY: &'static str = "FACTCHECK_GOOGLE_API_KEY";
    const ENV_GOOGLE_CX: &'static str = "FACTCHECK_GOOGLE_CX";
    const ENV_HF_TOKEN: &'static str = "FACTCHECK_HF_TOKEN";
    const ENV_MAX_ARTICLES: &'static str = "FACTCHECK_MAX_ARTICLES";
    const ENV_CAP_DEFAULT_SCORES: &'static str = "FACTCHECK_CAP_DEFAULT_SCORES";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let oracle_auth = Self::parse_oracle_auth_from_env(defaults.oracle_auth)?;

        Ok(Self {
            port,
            bind_addr,
            cors_origin: Self::parse_string_from_env(Self::ENV_CORS_ORIGIN, defaults.cors_origin),
            oracle_url: Self::parse_string_from_env(Self::ENV_ORACLE_URL, defaults.oracle_url),
            oracle_api_key: Self::parse_optional_string_from_env(Self::ENV_ORACLE_API_KEY),
            oracle_auth,
            oracle_model: Self::parse_string_from_env(
                Self::ENV_ORACLE_MODEL,
                defaults.oracle_model,
            ),
            generator_model: Self::parse_string_from_env(
                Self::ENV_GENERATOR_MODEL,
                defaults.generator_model,
            ),
            bing_api_key: Self::parse_optional_string_from_env(Self::ENV_BING_API_KEY),
            bing_url: Self::parse_string_from_env(Self::ENV_BING_URL, defaults.bing_url),
            google_api_key: Self::parse_optional_string_from_env(Self::ENV_GOOGLE_API_KEY),
            google_cx: Self::parse_optional_string_from_env(Self::ENV_GOOGLE_CX),
            hf_token: Self::parse_optional_string_from_env(Self::ENV_HF_TOKEN),
            max_articles: Self::parse_usize_from_env(Self::ENV_MAX_ARTICLES, defaults.max_articles),
            cap_default_scores: Self::parse_bool_from_env(
                Self::ENV_CAP_DEFAULT_SCORES,
                defaults.cap_default_scores,
            ),
        })
    }

    /// Validates endpoints and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_url(Self::ENV_ORACLE_URL, &self.oracle_url)?;
        Self::validate_url(Self::ENV_BING_URL, &self.bing_url)?;

        if self.max_articles == 0 {
            return Err(ConfigError::InvalidMaxArticles {
                value: self.max_articles,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidUrl {
                name,
                value: value.to_string(),
            })
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_oracle_auth_from_env(default: OracleAuth) -> Result<OracleAuth, ConfigError> {
        match env::var(Self::ENV_ORACLE_AUTH) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidOracleAuth { value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .ok()
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(default)
    }
}
