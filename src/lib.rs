//! Collab Relay - Real-time collaborative document editing relay
//!
//! Clients editing the same document connect over WebSocket, send edit
//! operations, and receive every participant's operations through a shared
//! fanout channel. Full-content syncs are persisted to the document store.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
