//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Identifier of a document row in the document store.
///
/// Documents are keyed by positive integers assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Creates a DocumentId, rejecting zero and negative values.
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::out_of_range("document_id", 1, i64::MAX, id));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::invalid_format("document_id", "expected an integer"))?;
        Self::new(id)
    }
}

/// Identifier of an authenticated user.
///
/// Serialized as a bare integer so it can be stamped onto relayed
/// operations as `"user_id": 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a UserId, rejecting zero and negative values.
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::out_of_range("user_id", 1, i64::MAX, id));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::invalid_format("user_id", "expected an integer"))?;
        Self::new(id)
    }
}

/// Unique identifier for one client connection.
///
/// Generated server-side when a socket is accepted; only used to correlate
/// log lines for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_rejects_non_positive() {
        assert!(DocumentId::new(0).is_err());
        assert!(DocumentId::new(-3).is_err());
        assert_eq!(DocumentId::new(42).unwrap().as_i64(), 42);
    }

    #[test]
    fn document_id_parses_from_path_segment() {
        let id: DocumentId = "17".parse().unwrap();
        assert_eq!(id.as_i64(), 17);
        assert!("abc".parse::<DocumentId>().is_err());
        assert!("-1".parse::<DocumentId>().is_err());
    }

    #[test]
    fn user_id_parses_from_subject_claim() {
        let id: UserId = "5".parse().unwrap();
        assert_eq!(id.to_string(), "5");
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn user_id_serializes_as_bare_integer() {
        let id = UserId::new(9).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
    }

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }
}
