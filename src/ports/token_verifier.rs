//! Token verification port for bearer credentials.
//!
//! This port defines the contract for turning a bearer credential into an
//! authenticated identity. It is provider-agnostic - the production adapter
//! verifies HS256 JWTs, tests use a token table.
//!
//! # Example Implementation
//!
//! ```ignore
//! pub struct JwtTokenVerifier { ... }
//!
//! #[async_trait]
//! impl TokenVerifier for JwtTokenVerifier {
//!     async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
//!         // 1. Check signature with the shared secret
//!         // 2. Check exp
//!         // 3. Parse sub into a UserId
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Verifies bearer credentials and extracts the user identity.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature
/// - Reject expired tokens with `AuthError::TokenExpired`
/// - Return `AuthError::InvalidToken` for malformed or badly signed tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw bearer token (no `Bearer ` prefix).
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
