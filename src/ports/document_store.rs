//! Document store port - the single durable write path of the relay.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::DocumentId;

/// Errors writing document content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// Persists full-document snapshots.
///
/// Writes are whole-content overwrites with no version check: the last
/// successful write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace the stored content of `document_id` with `content`.
    async fn write_content(&self, document_id: &DocumentId, content: &str)
        -> Result<(), StoreError>;
}
