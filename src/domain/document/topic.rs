//! Channel binding: document identifier to fanout topic name.

use std::fmt;

use crate::domain::foundation::DocumentId;

/// Prefix shared by every document topic.
pub const TOPIC_PREFIX: &str = "doc:";

/// Fanout topic for one document.
///
/// Derived from the document identifier alone, so every process computes
/// the same name without a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Topic carrying operations for `document_id`.
    pub fn for_document(document_id: DocumentId) -> Self {
        Self(format!("{}{}", TOPIC_PREFIX, document_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
