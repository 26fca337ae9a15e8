//! Authentication adapters.
//!
//! Implementations of the `TokenVerifier` port:
//!
//! - `jwt` - Shared-secret HMAC JWTs (production)
//! - `mock` - Fixed token table for tests

mod jwt;
mod mock;

pub use jwt::JwtTokenVerifier;
pub use mock::MockTokenVerifier;
