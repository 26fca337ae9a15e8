//! In-process adapters.
//!
//! - `InMemoryFanout` - Per-topic broadcast channels
//! - `InMemoryDocuments` - Documents, grants and a write log

mod documents;
mod fanout;

pub use documents::InMemoryDocuments;
pub use fanout::InMemoryFanout;
