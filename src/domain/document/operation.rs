//! Edit operations exchanged between clients and the relay.
//!
//! Wire format, one JSON object per frame:
//!
//! ```text
//! {"op":"insert","position":0,"text":"hi"}
//! {"op":"delete","position":3,"length":2}
//! {"op":"sync","content":"full document"}
//! ```
//!
//! Before relaying, the server stamps the authoring identity as `user_id`.
//! Any `user_id` supplied by the client is ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;

/// One edit or snapshot instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Splice `text` into the document at `position` (in characters).
    Insert { position: usize, text: String },

    /// Remove `length` characters starting at `position`.
    Delete {
        position: usize,
        #[serde(default = "default_delete_length")]
        length: usize,
    },

    /// Replace the whole document with `content`.
    Sync { content: String },
}

fn default_delete_length() -> usize {
    1
}

/// Reasons a client frame is not a usable operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedOperation {
    #[error("frame is not a valid operation: {0}")]
    InvalidShape(String),

    #[error("delete length must be at least 1")]
    ZeroLengthDelete,
}

impl Operation {
    /// Parses a client text frame into an operation.
    ///
    /// Unknown `op` values, missing required fields, negative or
    /// non-integer positions, and zero-length deletes are rejected.
    pub fn parse(frame: &str) -> Result<Self, MalformedOperation> {
        let operation: Operation = serde_json::from_str(frame)
            .map_err(|e| MalformedOperation::InvalidShape(e.to_string()))?;

        if let Operation::Delete { length: 0, .. } = operation {
            return Err(MalformedOperation::ZeroLengthDelete);
        }

        Ok(operation)
    }

    /// Wire name of the operation kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Insert { .. } => "insert",
            Operation::Delete { .. } => "delete",
            Operation::Sync { .. } => "sync",
        }
    }

    /// Attaches the authoring identity.
    pub fn stamp(self, user_id: UserId) -> StampedOperation {
        StampedOperation {
            operation: self,
            user_id,
        }
    }
}

/// An operation with its server-attached originator.
///
/// This is the payload published on the fanout topic and delivered to
/// every subscribed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedOperation {
    #[serde(flatten)]
    pub operation: Operation,
    pub user_id: UserId,
}

impl StampedOperation {
    /// Serializes to the JSON text published on the fanout topic.
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a payload received from the fanout topic.
    pub fn from_wire(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
