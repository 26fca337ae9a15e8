//! PostgreSQL implementation of DocumentAccess and DocumentStore.
//!
//! Reads and writes the `documents` and `collaborations` tables owned by the
//! document CRUD service. The relay never creates or migrates them.
//!
//! Identifier columns are `INTEGER` there, so they are widened to `BIGINT`
//! in every projection.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DocumentId, UserId};
use crate::ports::{AccessError, AccessibleDocument, DocumentAccess, DocumentStore, StoreError};

/// PostgreSQL document repository.
///
/// # Usage
///
/// ```rust,ignore
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = Arc::new(PostgresDocumentRepository::new(pool));
/// let gate = AccessGate::new(verifier, repo.clone());
/// let bridge = CheckpointBridge::new(repo);
/// ```
#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresDocumentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDocumentRepository")
            .field("pool", &"PgPool")
            .finish()
    }
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the access query.
type AccessRow = (i64, i64, Option<String>);

fn row_to_document(row: AccessRow) -> Result<AccessibleDocument, AccessError> {
    let (id, owner_id, content) = row;
    let id = DocumentId::new(id)
        .map_err(|e| AccessError::Unavailable(format!("Invalid document id in row: {}", e)))?;
    let owner_id = UserId::new(owner_id)
        .map_err(|e| AccessError::Unavailable(format!("Invalid owner id in row: {}", e)))?;
    Ok(AccessibleDocument {
        id,
        owner_id,
        content: content.unwrap_or_default(),
    })
}

#[async_trait]
impl DocumentAccess for PostgresDocumentRepository {
    async fn find_accessible(
        &self,
        user_id: &UserId,
        document_id: &DocumentId,
    ) -> Result<Option<AccessibleDocument>, AccessError> {
        let row: Option<AccessRow> = sqlx::query_as(
            r#"
            SELECT d.id::BIGINT, d.owner_id::BIGINT, d.content
            FROM documents d
            WHERE d.id = $1
              AND (
                d.owner_id = $2
                OR EXISTS (
                    SELECT 1 FROM collaborations c
                    WHERE c.document_id = d.id AND c.user_id = $2
                )
              )
            "#,
        )
        .bind(document_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccessError::Unavailable(format!("Database error: {}", e)))?;

        row.map(row_to_document).transpose()
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentRepository {
    async fn write_content(
        &self,
        document_id: &DocumentId,
        content: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE documents SET content = $2 WHERE id = $1")
            .bind(document_id.as_i64())
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Database error: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(*document_id));
        }

        Ok(())
    }
}
