//! Per-connection session state.

use crate::domain::document::WorkingCopy;
use crate::domain::foundation::{ConnectionId, DocumentId, UserId};
use crate::ports::FanoutSubscription;

use super::access_gate::SessionSeed;

/// Everything one authorized connection owns while it is live.
///
/// Exclusive to the connection: nothing else reads or writes the working
/// copy, and the subscription is released when the session ends.
#[derive(Debug)]
pub struct Session {
    pub(super) connection_id: ConnectionId,
    pub(super) document_id: DocumentId,
    pub(super) user_id: UserId,
    pub(super) working_copy: WorkingCopy,
    pub(super) subscription: FanoutSubscription,
}

impl Session {
    pub(super) fn open(seed: SessionSeed, subscription: FanoutSubscription) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            document_id: seed.document_id,
            user_id: seed.user.id,
            working_copy: WorkingCopy::new(seed.initial_content),
            subscription,
        }
    }
}

/// Which side ended a session first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client closed its connection.
    ClientClosed,
    /// Reading from the client failed.
    ClientError(String),
    /// Writing to the client failed.
    DeliveryFailed(String),
    /// The subscription stream ended.
    FanoutClosed,
    /// The subscription stream reported an error.
    FanoutError(String),
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEnd::ClientClosed => write!(f, "client closed"),
            SessionEnd::ClientError(e) => write!(f, "client read failed: {}", e),
            SessionEnd::DeliveryFailed(e) => write!(f, "client write failed: {}", e),
            SessionEnd::FanoutClosed => write!(f, "fanout subscription ended"),
            SessionEnd::FanoutError(e) => write!(f, "fanout subscription failed: {}", e),
        }
    }
}

/// What is left of a session once both loops have stopped.
#[derive(Debug)]
pub struct SessionOutcome {
    pub end: SessionEnd,
    /// Final state of the connection's working copy.
    pub working_copy: WorkingCopy,
}
