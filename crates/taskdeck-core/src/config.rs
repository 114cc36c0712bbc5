//! Configuration

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::app::CsrfMode;

/// API のベース URL
pub const ENV_API_URL: &str = "TASKDECK_API_URL";
/// `background` | `await`
pub const ENV_CSRF_MODE: &str = "TASKDECK_CSRF_MODE";
/// リクエストのタイムアウト（秒）。未設定ならタイムアウトなし
pub const ENV_TIMEOUT_SECS: &str = "TASKDECK_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("unsupported url scheme {0}, expected http or https")]
    UnsupportedScheme(String),
}

/// Configuration for the task client
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST backend
    pub api_url: Url,

    /// How bootstrap waits for the CSRF token
    pub csrf_mode: CsrfMode,

    /// Request timeout in seconds (`None` = no timeout)
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            csrf_mode: CsrfMode::default(),
            request_timeout_secs: None,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|name| env::var(name).ok())?;
        info!(api_url = %config.api_url, "loaded config from environment");
        Ok(config)
    }

    /// 環境変数の読み出し方を差し替えられる版（テスト用）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(ENV_API_URL).ok_or(ConfigError::MissingVar(ENV_API_URL))?;
        let api_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::InvalidValue {
            var: ENV_API_URL,
            reason: e.to_string(),
        })?;
        let mut config = Self::new(api_url);

        if let Some(val) = lookup(ENV_CSRF_MODE) {
            config.csrf_mode = val
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: ENV_CSRF_MODE,
                    reason,
                })?;
        }

        if let Some(val) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = val.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: ENV_TIMEOUT_SECS,
                    reason: e.to_string(),
                }
            })?;
            config.request_timeout_secs = Some(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                var: ENV_TIMEOUT_SECS,
                reason: "timeout must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
