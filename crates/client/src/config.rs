//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CARTAOZINHO_API_URL` - Backend base URL including `/api`
//!   (default: the production server)
//! - `CARTAOZINHO_DATA_DIR` - Directory holding the saved session
//!   (default: `$HOME/.cartaozinho`)
//! - `CARTAOZINHO_PUSH_TOKEN` - Push token granted to this device; when unset,
//!   notification permission is treated as denied
//! - `CARTAOZINHO_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds
//!   (default: none, the transport default applies)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Production backend.
pub const DEFAULT_API_URL: &str =
    "https://appcartaozinho-servercartaozinho.5gttis.easypanel.host/api";

/// Directory name used under `$HOME` when no data directory is configured.
const DEFAULT_DATA_DIR_NAME: &str = ".cartaozinho";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
///
/// Implements `Debug` manually to redact the push token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://host/api`
    pub api_url: Url,
    /// Directory holding the saved session
    pub data_dir: PathBuf,
    /// Push token granted to this device
    pub push_token: Option<String>,
    /// Per-request timeout
    pub request_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("data_dir", &self.data_dir)
            .field(
                "push_token",
                &self.push_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = parse_api_url(
            "CARTAOZINHO_API_URL",
            &lookup("CARTAOZINHO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let data_dir = lookup("CARTAOZINHO_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| default_data_dir(lookup("HOME")), PathBuf::from);

        let push_token = lookup("CARTAOZINHO_PUSH_TOKEN").filter(|t| !t.trim().is_empty());

        let request_timeout = lookup("CARTAOZINHO_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        ConfigError::InvalidEnvVar(
                            "CARTAOZINHO_REQUEST_TIMEOUT_SECS".to_string(),
                            format!("expected a positive number of seconds, got {raw:?}"),
                        )
                    })
            })
            .transpose()?;

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());

        Ok(Self {
            api_url,
            data_dir,
            push_token,
            request_timeout,
            sentry_dsn,
        })
    }

    /// Configuration pointing at `api_url` with everything else defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not an HTTP(S) URL.
    pub fn for_api_url(api_url: &str, data_dir: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url("api_url", api_url)?,
            data_dir,
            push_token: None,
            request_timeout: None,
            sentry_dsn: None,
        })
    }

    /// Replace the backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not an HTTP(S) URL.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url("--api-url", api_url)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and check a backend base URL.
fn parse_api_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    home.filter(|h| !h.is_empty()).map_or_else(
        || PathBuf::from(DEFAULT_DATA_DIR_NAME),
        |home| PathBuf::from(home).join(DEFAULT_DATA_DIR_NAME),
    )
}
