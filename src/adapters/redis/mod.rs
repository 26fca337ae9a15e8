//! Redis adapters.
//!
//! - `RedisFanout` - Cross-process fanout over Redis PUBLISH / SUBSCRIBE

mod fanout;

pub use fanout::RedisFanout;
