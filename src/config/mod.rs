//! Relay configuration, read from `COLLAB_RELAY__<SECTION>__<KEY>` variables.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Loading only checks shape; call [`AppConfig::validate`] before starting
//! the listener.
//!
//! ```no_run
//! use collab_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("load configuration");
//! config.validate().expect("valid configuration");
//! ```

mod auth;
mod database;
mod error;
mod redis;
mod server;

pub use self::auth::{AuthConfig, JwtAlgorithm, MIN_PRODUCTION_SECRET_BYTES};
pub use self::database::DatabaseConfig;
pub use self::error::{ConfigError, ValidationError};
pub use self::redis::RedisConfig;
pub use self::server::{Environment, ServerConfig};

use serde::Deserialize;

/// Everything the relay process needs at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Grant lookups and snapshot writes.
    pub database: DatabaseConfig,

    /// Cross-process fanout of document topics.
    pub redis: RedisConfig,

    /// Bearer token verification.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Read the environment (plus `.env`) into typed sections.
    ///
    /// `COLLAB_RELAY__REDIS__URL=redis://cache:6379` sets `redis.url`.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` when a required key is absent or a value
    /// does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COLLAB_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Range and format checks across every section, server first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

/// Timeouts are whole seconds in `1..=300`.
fn check_timeout_secs(secs: u64) -> Result<(), ValidationError> {
    if (1..=300).contains(&secs) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeout)
    }
}
