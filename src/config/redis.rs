//! Fanout broker settings.

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

const REDIS_SCHEMES: [&str; 2] = ["redis://", "rediss://"];

/// Where the relay publishes and subscribes document topics.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,

    /// Upper bound on connecting, each publish, and each subscribe.
    #[serde(default = "RedisConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    fn default_timeout_secs() -> u64 {
        5
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !REDIS_SCHEMES.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(ValidationError::InvalidRedisUrl);
        }
        super::check_timeout_secs(self.timeout_secs)
    }
}
