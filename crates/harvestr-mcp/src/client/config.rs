//! Harvestr client configuration.
//!
//! Holds the API token, base URL and request timeout used by
//! [`HarvestrClient`](super::HarvestrClient). Configuration is loaded from
//! environment variables with production defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the Harvestr private app token.
pub const TOKEN_ENV_VAR: &str = "HARVESTR_API_TOKEN";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "HARVESTR_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "HARVESTR_TIMEOUT_SECS";

/// Production Harvestr REST API.
pub const DEFAULT_BASE_URL: &str = "https://rest.harvestr.io/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a Harvestr API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Private app token. `None` means "not configured"; the client refuses
    /// to build without one.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Base URL for the REST API (e.g., "https://rest.harvestr.io/v1").
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    /// Returns the production endpoint with no token.
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HARVESTR_API_TOKEN`: private app token (required to build a client)
    /// - `HARVESTR_API_URL`: API base URL (default: https://rest.harvestr.io/v1)
    /// - `HARVESTR_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            token: non_empty(std::env::var(TOKEN_ENV_VAR).ok()),
            base_url: std::env::var(BASE_URL_ENV_VAR).unwrap_or(default.base_url),
            timeout_secs: std::env::var(TIMEOUT_ENV_VAR)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    /// Configuration with an explicit token and default endpoint.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Override the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a full URL by appending an endpoint path to the base URL.
    pub fn url(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        format!("{}/{}", base, endpoint)
    }
}

/// Pick the explicit token if present, otherwise the environment value.
///
/// Empty strings count as absent on both sides.
pub fn resolve_token(explicit: Option<String>, from_env: Option<String>) -> Option<String> {
    non_empty(explicit).or_else(|| non_empty(from_env))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
