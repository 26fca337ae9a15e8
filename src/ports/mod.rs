//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay and the systems it does not own. Adapters implement these ports.
//!
//! ## Identity & Grants
//!
//! - `TokenVerifier` - Bearer credential to identity
//! - `DocumentAccess` - Ownership / sharing-grant check that also yields the seed content
//!
//! ## Storage
//!
//! - `DocumentStore` - Whole-document snapshot writes
//!
//! ## Fanout
//!
//! - `FanoutChannel` - Topic publish/subscribe shared across server processes
//! - `FanoutSubscription` - One live topic subscription

mod document_access;
mod document_store;
mod fanout_channel;
mod token_verifier;

pub use document_access::{AccessError, AccessibleDocument, DocumentAccess};
pub use document_store::{DocumentStore, StoreError};
pub use fanout_channel::{FanoutChannel, FanoutError, FanoutStream, FanoutSubscription};
pub use token_verifier::TokenVerifier;
