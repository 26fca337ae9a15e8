//! Mock token verifier for testing.
//!
//! Maps fixed token strings to user ids so tests can exercise the Access
//! Gate without signing real JWTs.
//!
//! # Example
//!
//! ```ignore
//! use collab_relay::adapters::auth::MockTokenVerifier;
//! use collab_relay::domain::foundation::UserId;
//!
//! let verifier = MockTokenVerifier::new()
//!     .with_user("alice-token", UserId::new(1).unwrap());
//!
//! let user = verifier.verify("alice-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::TokenVerifier;

/// Token verifier backed by an in-memory token table.
///
/// Tokens not in the table return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    tokens: RwLock<HashMap<String, UserId>>,
    /// Returned for every verification when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `user_id`.
    pub fn with_user(self, token: impl Into<String>, user_id: UserId) -> Self {
        self.add_token(token, user_id);
        self
    }

    /// Fail every verification with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .expect("MockTokenVerifier: error lock poisoned") = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self
            .force_error
            .write()
            .expect("MockTokenVerifier: error lock poisoned") = None;
    }

    /// Registers a token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens
            .write()
            .expect("MockTokenVerifier: token lock poisoned")
            .insert(token.into(), user_id);
    }

    /// Revokes a token.
    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .expect("MockTokenVerifier: token lock poisoned")
            .remove(token);
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .expect("MockTokenVerifier: error lock poisoned")
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .expect("MockTokenVerifier: token lock poisoned")
            .get(token)
            .copied()
            .map(AuthenticatedUser::new)
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn known_token_resolves_to_user() {
        let verifier = MockTokenVerifier::new().with_user("t", user(5));

        assert_eq!(verifier.verify("t").await.unwrap().id, user(5));
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let verifier = MockTokenVerifier::new();

        assert_eq!(verifier.verify("t").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn forced_error_wins_until_cleared() {
        let verifier = MockTokenVerifier::new()
            .with_user("t", user(5))
            .with_error(AuthError::TokenExpired);

        assert_eq!(verifier.verify("t").await, Err(AuthError::TokenExpired));

        verifier.clear_error();
        assert!(verifier.verify("t").await.is_ok());
    }

    #[tokio::test]
    async fn removed_token_stops_working() {
        let verifier = MockTokenVerifier::new().with_user("t", user(5));
        verifier.remove_token("t");

        assert_eq!(verifier.verify("t").await, Err(AuthError::InvalidToken));
    }
}
