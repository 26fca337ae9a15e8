//! Shared-secret JWT adapter for bearer credentials.
//!
//! Tokens are HMAC-signed JWTs carrying the numeric user id in `sub` and a
//! mandatory `exp`. The same secret signs and verifies, so this adapter can
//! also mint tokens for tests and local tooling.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::TokenVerifier;

/// Claims carried by a relay bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelayClaims {
    /// Decimal user id.
    sub: String,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

/// Verifies (and issues) HMAC-signed bearer tokens.
pub struct JwtTokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl JwtTokenVerifier {
    /// Creates a verifier for `secret` using an HMAC `algorithm`.
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl: Duration::from_secs(3600),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.jwt_algorithm.as_algorithm(),
        )
        .with_default_ttl(config.token_ttl())
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Mint a token for `user_id` valid for `ttl` from now.
    pub fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = RelayClaims {
            sub: user_id.to_string(),
            exp: now.saturating_add(ttl),
            iat: Some(now),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            AuthError::service_unavailable(e.to_string())
        })
    }

    /// Mint a token with the configured default lifetime.
    pub fn issue_default(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue(user_id, self.default_ttl)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<RelayClaims>(token, &self.decoding_key, &self.validation()).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::debug!(error = %e, "token validation failed");
                        AuthError::InvalidToken
                    }
                }
            },
        )?;

        let user_id: UserId = data.claims.sub.parse().map_err(|_| {
            tracing::warn!(sub = %data.claims.sub, "token subject is not a user id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id))
    }
}

impl std::fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenVerifier")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
