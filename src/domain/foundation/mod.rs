//! Foundation module - Shared domain primitives.
//!
//! Identifiers, authentication types, and validation errors that form the
//! vocabulary of the relay.

mod auth;
mod errors;
mod ids;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::ValidationError;
pub use ids::{ConnectionId, DocumentId, UserId};
