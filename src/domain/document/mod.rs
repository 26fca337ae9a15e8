//! Document editing domain module.
//!
//! The operation protocol, the per-session working copy, and the
//! document-to-topic channel binding.

mod operation;
mod topic;
mod working_copy;

pub use operation::{MalformedOperation, Operation, StampedOperation};
pub use topic::{Topic, TOPIC_PREFIX};
pub use working_copy::WorkingCopy;
