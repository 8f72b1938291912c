//! Configuration for the HTTP lot source.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL of the public data portal API.
const DEFAULT_BASE_URL: &str = "https://api.odcloud.kr/api";

/// Default dataset path (parking facilities in buildings).
const DEFAULT_SERVICE_PATH: &str =
    "15064338/v1/uddi:91ea9cb0-f9d1-48ab-ab53-89c0a6b94451";

/// Where and how to query the public data portal.
///
/// The API key has no default. Supply it through [`SourceConfig::from_env`]
/// or set it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,

    /// Dataset path appended to `base_url`.
    pub service_path: String,

    /// Portal service key, sent as the `serviceKey` query parameter.
    pub api_key: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            service_path: DEFAULT_SERVICE_PATH.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl SourceConfig {
    /// Builds a config from the defaults, overridden by environment
    /// variables:
    ///
    /// | variable                  | field          |
    /// |---------------------------|----------------|
    /// | `PUBLIC_API_BASE_URL`     | `base_url`     |
    /// | `PUBLIC_API_SERVICE_PATH` | `service_path` |
    /// | `PUBLIC_API_KEY`          | `api_key`      |
    /// | `PUBLIC_API_TIMEOUT_SECS` | `timeout`      |
    ///
    /// An unparsable timeout keeps the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("PUBLIC_API_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("PUBLIC_API_SERVICE_PATH") {
            config.service_path = path.trim_start_matches('/').to_string();
        }
        if let Some(key) = lookup("PUBLIC_API_KEY") {
            config.api_key = key;
        }
        if let Some(secs) =
            lookup("PUBLIC_API_TIMEOUT_SECS").and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Full endpoint URL: `{base_url}/{service_path}`.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.service_path)
    }
}
