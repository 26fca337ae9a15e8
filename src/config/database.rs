//! Settings for the Postgres pool backing grant lookups and snapshot writes.

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

const POSTGRES_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];
const MAX_POOL_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    /// Each session does one grant lookup on connect and then writes only on
    /// `sync`, so a small pool goes a long way.
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,

    /// How long to wait for a pooled connection before failing the query.
    #[serde(default = "DatabaseConfig::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_connect_timeout_secs() -> u64 {
        5
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !POSTGRES_SCHEMES.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if !(1..=MAX_POOL_SIZE).contains(&self.max_connections) {
            return Err(ValidationError::InvalidPoolSize);
        }
        super::check_timeout_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: DatabaseConfig::default_max_connections(),
            connect_timeout_secs: DatabaseConfig::default_connect_timeout_secs(),
        }
    }

    #[test]
    fn both_postgres_schemes_are_accepted() {
        assert!(pool("postgres://relay@db/docs").validate().is_ok());
        assert!(pool("postgresql://relay:pw@localhost:5432/docs").validate().is_ok());
    }

    #[test]
    fn defaults_are_a_small_pool_with_short_acquire_wait() {
        let config = pool("postgres://db/docs");

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn blank_url_is_reported_missing() {
        assert_eq!(
            pool("").validate(),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        );
    }

    #[test]
    fn foreign_database_scheme_is_rejected() {
        assert_eq!(
            pool("mysql://localhost/docs").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn pool_size_must_be_between_one_and_the_cap() {
        for size in [0, MAX_POOL_SIZE + 1] {
            let config = DatabaseConfig {
                max_connections: size,
                ..pool("postgres://db/docs")
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidPoolSize));
        }

        let at_cap = DatabaseConfig {
            max_connections: MAX_POOL_SIZE,
            ..pool("postgres://db/docs")
        };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn acquire_timeout_over_five_minutes_is_rejected() {
        let config = DatabaseConfig {
            connect_timeout_secs: 301,
            ..pool("postgres://db/docs")
        };

        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
