//! In-memory document table with sharing grants.
//!
//! Implements both `DocumentAccess` and `DocumentStore`, recording every
//! successful write so tests can assert on checkpoint traffic.
//!
//! # Panics
//!
//! Methods panic if an internal lock is poisoned. Not for production use.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::{DocumentId, UserId};
use crate::ports::{AccessError, AccessibleDocument, DocumentAccess, DocumentStore, StoreError};

#[derive(Debug, Clone)]
struct StoredDocument {
    owner_id: UserId,
    content: String,
}

/// Documents, grants and a write log held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    documents: RwLock<HashMap<DocumentId, StoredDocument>>,
    grants: RwLock<HashSet<(DocumentId, UserId)>>,
    writes: RwLock<Vec<(DocumentId, String)>>,
    fail_lookups: AtomicBool,
    fail_writes: AtomicBool,
    write_delays: RwLock<HashMap<String, Duration>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a document owned by `owner_id`.
    pub fn insert_document(&self, id: DocumentId, owner_id: UserId, content: impl Into<String>) {
        self.documents
            .write()
            .expect("InMemoryDocuments: documents lock poisoned")
            .insert(
                id,
                StoredDocument {
                    owner_id,
                    content: content.into(),
                },
            );
    }

    /// Shares `document_id` with `user_id`.
    pub fn grant(&self, document_id: DocumentId, user_id: UserId) {
        self.grants
            .write()
            .expect("InMemoryDocuments: grants lock poisoned")
            .insert((document_id, user_id));
    }

    /// Current stored content, if the document exists.
    pub fn content_of(&self, id: DocumentId) -> Option<String> {
        self.documents
            .read()
            .expect("InMemoryDocuments: documents lock poisoned")
            .get(&id)
            .map(|doc| doc.content.clone())
    }

    /// Every successful write, oldest first.
    pub fn writes(&self) -> Vec<(DocumentId, String)> {
        self.writes
            .read()
            .expect("InMemoryDocuments: writes lock poisoned")
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes
            .read()
            .expect("InMemoryDocuments: writes lock poisoned")
            .len()
    }

    /// Make grant lookups fail as if the database were down.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Make writes fail as if the database were down.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stall every write of exactly `content` by `delay` before it lands.
    pub fn delay_writes_of(&self, content: impl Into<String>, delay: Duration) {
        self.write_delays
            .write()
            .expect("InMemoryDocuments: write_delays lock poisoned")
            .insert(content.into(), delay);
    }
}

#[async_trait]
impl DocumentAccess for InMemoryDocuments {
    async fn find_accessible(
        &self,
        user_id: &UserId,
        document_id: &DocumentId,
    ) -> Result<Option<AccessibleDocument>, AccessError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AccessError::Unavailable("in-memory lookup disabled".into()));
        }

        let documents = self
            .documents
            .read()
            .expect("InMemoryDocuments: documents lock poisoned");
        let Some(document) = documents.get(document_id) else {
            return Ok(None);
        };

        let granted = document.owner_id == *user_id
            || self
                .grants
                .read()
                .expect("InMemoryDocuments: grants lock poisoned")
                .contains(&(*document_id, *user_id));

        Ok(granted.then(|| AccessibleDocument {
            id: *document_id,
            owner_id: document.owner_id,
            content: document.content.clone(),
        }))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocuments {
    async fn write_content(
        &self,
        document_id: &DocumentId,
        content: &str,
    ) -> Result<(), StoreError> {
        let delay = self
            .write_delays
            .read()
            .expect("InMemoryDocuments: write_delays lock poisoned")
            .get(content)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory writes disabled".into()));
        }

        let mut documents = self
            .documents
            .write()
            .expect("InMemoryDocuments: documents lock poisoned");
        let document = documents
            .get_mut(document_id)
            .ok_or(StoreError::NotFound(*document_id))?;
        document.content = content.to_string();

        self.writes
            .write()
            .expect("InMemoryDocuments: writes lock poisoned")
            .push((*document_id, content.to_string()));
        Ok(())
    }
}
