//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the relay to external systems:
//! - `auth` - Bearer token verification (JWT, mock)
//! - `postgres` - Document grants and snapshot writes
//! - `redis` - Cross-process fanout
//! - `memory` - In-process fanout and documents for tests / single node
//! - `websocket` - Collaboration endpoint
//! - `http` - Router, CORS, tracing, health

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod websocket;

pub use auth::{JwtTokenVerifier, MockTokenVerifier};
pub use memory::{InMemoryDocuments, InMemoryFanout};
pub use postgres::PostgresDocumentRepository;
pub use self::redis::RedisFanout;
pub use websocket::RelayState;
