//! WebSocket adapter for collaboration sessions.
//!
//! ```text
//!  client ──ws──▶ collaboration_ws ──▶ AccessGate ──▶ SessionRuntime
//!                                                        │      ▲
//!                                               publish  ▼      │ subscribe
//!                                                    FanoutChannel
//! ```

pub mod handler;

pub use handler::{collaboration_ws, ConnectParams, RelayState};
