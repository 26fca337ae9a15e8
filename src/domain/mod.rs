//! Domain layer containing the relay's core types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, identity, validation errors)
//! - `document` - Edit operations, the per-connection working copy, topics

pub mod document;
pub mod foundation;
