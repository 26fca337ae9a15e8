//! HTTP adapters - router and probes.

pub mod router;

pub use router::{cors_layer, health, relay_router};
