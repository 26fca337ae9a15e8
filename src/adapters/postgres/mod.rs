//! PostgreSQL adapters.
//!
//! - `PostgresDocumentRepository` - Grant lookups and snapshot writes

mod document_repository;

pub use document_repository::PostgresDocumentRepository;
