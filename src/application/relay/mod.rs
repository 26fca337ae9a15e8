//! Relay - the collaboration session lifecycle.
//!
//! A connection passes the [`AccessGate`] once, gets a [`Session`] from the
//! [`SessionRuntime`], and runs until its client or its subscription goes
//! away. Client syncs are persisted through the [`CheckpointBridge`].

mod access_gate;
mod checkpoint;
pub mod close_codes;
mod runtime;
mod session;

pub use access_gate::{AccessGate, GateRejection, SessionSeed};
pub use checkpoint::{CheckpointBridge, CheckpointWriter};
pub use runtime::SessionRuntime;
pub use session::{Session, SessionEnd, SessionOutcome};
