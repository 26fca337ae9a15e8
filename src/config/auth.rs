//! Authentication configuration (shared-secret JWT)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 16;

/// Bearer token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret shared with the token issuer
    pub jwt_secret: SecretString,

    /// Signing algorithm
    #[serde(default)]
    pub jwt_algorithm: JwtAlgorithm,

    /// Lifetime of tokens minted by this process, in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

/// HMAC algorithms accepted for bearer tokens
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum JwtAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl JwtAlgorithm {
    pub fn as_algorithm(self) -> jsonwebtoken::Algorithm {
        match self {
            JwtAlgorithm::HS256 => jsonwebtoken::Algorithm::HS256,
            JwtAlgorithm::HS384 => jsonwebtoken::Algorithm::HS384,
            JwtAlgorithm::HS512 => jsonwebtoken::Algorithm::HS512,
        }
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Validate authentication configuration
    ///
    /// In production the secret must be at least
    /// [`MIN_PRODUCTION_SECRET_BYTES`] long.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len == 0 {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if *environment == Environment::Production && secret_len < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_BYTES));
        }
        if self.token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        Ok(())
    }
}

fn default_token_ttl() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            jwt_algorithm: JwtAlgorithm::default(),
            token_ttl_secs: default_token_ttl(),
        }
    }

    #[test]
    fn test_short_secret_allowed_in_development() {
        assert!(config("dev").validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_short_secret_rejected_in_production() {
        assert_eq!(
            config("dev").validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_BYTES))
        );
        assert!(config("a-much-longer-production-secret")
            .validate(&Environment::Production)
            .is_ok());
    }

    #[test]
    fn test_empty_secret_is_missing() {
        assert_eq!(
            config("").validate(&Environment::Development),
            Err(ValidationError::MissingRequired("JWT_SECRET"))
        );
    }

    #[test]
    fn test_zero_ttl_is_invalid() {
        let mut config = config("dev");
        config.token_ttl_secs = 0;
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidTokenTtl)
        );
    }

    #[test]
    fn test_algorithm_mapping() {
        assert_eq!(JwtAlgorithm::default().as_algorithm(), jsonwebtoken::Algorithm::HS256);
        assert_eq!(JwtAlgorithm::HS512.as_algorithm(), jsonwebtoken::Algorithm::HS512);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", config("super-secret-value"));
        assert!(!debug.contains("super-secret-value"));
    }
}
