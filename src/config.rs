//! Environment-driven configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// API key variable, shared with the Google AI SDKs.
pub const API_KEY_ENV_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

/// Override for the Gemini API host (used by tests and proxies).
pub const BASE_URL_ENV_VAR: &str = "CRIT_GEMINI_BASE_URL";

/// Per-request transport timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "CRIT_REQUEST_TIMEOUT";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default request timeout (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Settings needed to talk to Gemini.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = env::var(BASE_URL_ENV_VAR)
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            request_timeout: request_timeout(),
        })
    }
}

/// Get the configured request timeout.
///
/// Logs a warning and falls back to the default when the variable is set
/// to something that is not a whole number of seconds.
pub fn request_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
