//! Document access port for sharing-grant checks.
//!
//! Answers "may this identity open this document" and, when it may, returns
//! the document's current stored content to seed the session.
//!
//! # Design
//!
//! The check follows a **fail-secure** design: a missing document and a
//! document the user has no grant on are reported identically (`Ok(None)`),
//! so a client cannot probe for document existence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DocumentId, UserId};

/// A document the requesting user owns or has been granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibleDocument {
    pub id: DocumentId,
    pub owner_id: UserId,
    /// Stored content at the time of the check.
    pub content: String,
}

/// Errors from the grant lookup itself (not denials).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Document access lookup unavailable: {0}")]
    Unavailable(String),
}

/// Port for checking ownership and sharing grants.
#[async_trait]
pub trait DocumentAccess: Send + Sync {
    /// Returns the document if it exists and `user_id` owns it or holds a
    /// sharing grant on it; `Ok(None)` otherwise.
    async fn find_accessible(
        &self,
        user_id: &UserId,
        document_id: &DocumentId,
    ) -> Result<Option<AccessibleDocument>, AccessError>;
}
