//! Checkpoint Bridge - persists full-document snapshots off the relay path.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::domain::foundation::DocumentId;
use crate::ports::{DocumentStore, StoreError};

/// Hands full-content snapshots to the document store.
///
/// Only client-originated syncs reach this bridge; relayed traffic never
/// does. The write has no version check, so concurrent snapshots for the
/// same document resolve last-writer-wins at the store.
#[derive(Clone)]
pub struct CheckpointBridge {
    store: Arc<dyn DocumentStore>,
}

impl CheckpointBridge {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write `content` as the stored content of `document_id` and wait for it.
    pub async fn persist_snapshot(
        &self,
        document_id: DocumentId,
        content: &str,
    ) -> Result<(), StoreError> {
        self.store.write_content(&document_id, content).await?;
        tracing::debug!(%document_id, bytes = content.len(), "snapshot persisted");
        Ok(())
    }

    /// Start the snapshot writer for one session.
    ///
    /// Snapshots are written one at a time in the order they were queued, so
    /// a session's later sync can never be overtaken by an earlier one.
    pub fn writer(&self, document_id: DocumentId) -> CheckpointWriter {
        let (snapshots, mut queue) = mpsc::unbounded_channel::<String>();
        let bridge = self.clone();

        let task = tokio::spawn(
            async move {
                while let Some(content) = queue.recv().await {
                    if let Err(e) = bridge.persist_snapshot(document_id, &content).await {
                        tracing::warn!(%document_id, error = %e, "snapshot persistence failed");
                    }
                }
            }
            .in_current_span(),
        );

        CheckpointWriter { snapshots, task }
    }
}

impl std::fmt::Debug for CheckpointBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointBridge").finish_non_exhaustive()
    }
}

/// Ordered snapshot queue owned by a single session.
///
/// Queuing never waits on storage. A failed write is logged and the next
/// snapshot is still attempted.
#[derive(Debug)]
pub struct CheckpointWriter {
    snapshots: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl CheckpointWriter {
    pub fn enqueue(&self, content: String) {
        if self.snapshots.send(content).is_err() {
            tracing::warn!("checkpoint writer stopped, snapshot dropped");
        }
    }

    /// Stop accepting snapshots and wait for the queued ones to be written.
    pub async fn finish(self) {
        drop(self.snapshots);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "checkpoint writer task failed");
        }
    }
}
