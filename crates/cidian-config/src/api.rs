use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Dictionary backend endpoint
#[derive(Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL, request paths are appended to it
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10000,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        let defaults = Self::default();

        let base_url = env::var("DICTIONARY_API_URL").unwrap_or(defaults.base_url);

        let timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_ms);

        Self {
            base_url,
            timeout_ms,
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
