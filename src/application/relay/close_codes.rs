//! WebSocket close codes used by the collaboration endpoint.
//!
//! 4000-range codes are application-defined; 1011 is the standard
//! "internal error" code for downstream failures.

/// No `token` query parameter (or an empty one).
pub const MISSING_CREDENTIAL: u16 = 4000;

/// Token failed verification, is expired, or is malformed.
pub const INVALID_CREDENTIAL: u16 = 4001;

/// Valid identity without ownership of or a grant on the document.
pub const ACCESS_DENIED: u16 = 4003;

/// A dependency (fanout broker, identity or grant service) failed.
pub const INTERNAL_ERROR: u16 = 1011;

/// Close reason sent when the fanout subscription cannot be opened.
pub const FANOUT_UNAVAILABLE_REASON: &str = "Fanout subscription failed";
