//! Authentication types for the domain layer.
//!
//! These types represent an identity extracted from a bearer credential.
//! They have **no external dependencies** - any identity service can
//! populate them via the `TokenVerifier` port.

use super::UserId;
use thiserror::Error;

/// Identity extracted from a verified bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user the credential was issued to.
    pub id: UserId,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId) -> Self {
        Self { id }
    }
}

/// Errors that can occur during credential verification.
///
/// These errors are **domain-centric** - they describe what went wrong
/// from the relay's perspective, not the identity provider's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is malformed, has a bad signature, or carries an unusable subject.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The identity service could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the client must obtain a new credential.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
