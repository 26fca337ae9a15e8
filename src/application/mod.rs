//! Application layer - session orchestration.
//!
//! Coordinates the domain model with the ports: authorizing connections,
//! running sessions, and persisting snapshots.

pub mod relay;

pub use relay::{
    AccessGate, CheckpointBridge, CheckpointWriter, GateRejection, Session, SessionEnd,
    SessionOutcome, SessionRuntime, SessionSeed,
};
