use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://spelling-backend.onrender.com/api";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout, seconds.
    pub timeout_secs: u64,
    pub refresh_timeout_secs: u64,
    pub retry_pause_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 90,
            refresh_timeout_secs: 30,
            retry_pause_ms: 1_000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_slashes() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/api/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint("/practice/start"),
            "http://localhost:3000/api/practice/start"
        );
        assert_eq!(config.timeout(), Duration::from_secs(90));
    }
}
