//! Remote store configuration.
//!
//! Configuration comes from code or from `NOTEPAL_STORE_*` environment
//! variables (a `.env` file is loaded by the session's startup code).
//!
//! | Variable | Default |
//! |----------|---------|
//! | NOTEPAL_STORE_URL | http://localhost:54321/rest/v1 |
//! | NOTEPAL_STORE_KEY | (none) |
//! | NOTEPAL_STORE_TABLE | notes |
//! | NOTEPAL_STORE_TIMEOUT | 30 |
//! | NOTEPAL_STORE_SKIP_TLS_VERIFY | false |

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use notepal_core::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for notepal_core::Error {
    fn from(e: ConfigError) -> Self {
        notepal_core::Error::Config(e.to_string())
    }
}

/// Connection settings for the remote note store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// REST root, e.g. `https://<project>.supabase.co/rest/v1`.
    pub base_url: String,
    /// API key sent as `apikey` and bearer token (optional for local stores).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Table holding the notes.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (self-signed certs in local environments).
    #[serde(default)]
    pub skip_tls_verify: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::STORE_URL.to_string(),
            api_key: None,
            table: defaults::NOTES_TABLE.to_string(),
            timeout_seconds: defaults::STORE_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

impl StoreConfig {
    /// Build from `NOTEPAL_STORE_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        let base = Self::default();

        let timeout_seconds = match env::var("NOTEPAL_STORE_TIMEOUT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "NOTEPAL_STORE_TIMEOUT",
                value,
            })?,
            Err(_) => base.timeout_seconds,
        };

        let config = Self {
            base_url: env::var("NOTEPAL_STORE_URL").unwrap_or(base.base_url),
            api_key: env::var("NOTEPAL_STORE_KEY").ok().filter(|k| !k.is_empty()),
            table: env::var("NOTEPAL_STORE_TABLE").unwrap_or(base.table),
            timeout_seconds,
            skip_tls_verify: env::var("NOTEPAL_STORE_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "store base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "store base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.table.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store table cannot be empty".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "store timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of the notes table endpoint.
    pub fn table_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}
