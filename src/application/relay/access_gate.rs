//! Access Gate - one-shot authorization of an inbound connection.
//!
//! Runs once per connection attempt, before any session state exists:
//!
//! 1. A credential must be present (an empty string counts as absent)
//! 2. The credential must verify to an identity
//! 3. That identity must own or hold a grant on the target document
//!
//! The outcome is never re-evaluated for the life of the session.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{AuthError, AuthenticatedUser, DocumentId};
use crate::ports::{DocumentAccess, TokenVerifier};

use super::close_codes;

/// What an authorized connection starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    pub document_id: DocumentId,
    pub user: AuthenticatedUser,
    /// Stored document content at authorization time.
    pub initial_content: String,
}

/// Why a connection attempt was refused.
///
/// Each variant maps to a distinct, stable close code so clients can tell
/// a missing token from a bad one from a missing grant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("token is required")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidCredential,

    #[error("Access denied")]
    AccessDenied,

    /// The identity or grant service failed; not a verdict on the client.
    #[error("Authorization service unavailable")]
    ServiceUnavailable(String),
}

impl GateRejection {
    /// WebSocket close code sent to the client.
    pub fn close_code(&self) -> u16 {
        match self {
            GateRejection::MissingCredential => close_codes::MISSING_CREDENTIAL,
            GateRejection::InvalidCredential => close_codes::INVALID_CREDENTIAL,
            GateRejection::AccessDenied => close_codes::ACCESS_DENIED,
            GateRejection::ServiceUnavailable(_) => close_codes::INTERNAL_ERROR,
        }
    }

    /// Close reason text sent to the client.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Validates credentials and document grants for new connections.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<dyn TokenVerifier>,
    access: Arc<dyn DocumentAccess>,
}

impl AccessGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, access: Arc<dyn DocumentAccess>) -> Self {
        Self { verifier, access }
    }

    /// Authorize `credential` for `document_id`.
    ///
    /// Returns the session seed on success. A document that does not exist
    /// is reported as `AccessDenied`, same as one the user cannot see.
    pub async fn authorize(
        &self,
        credential: Option<&str>,
        document_id: DocumentId,
    ) -> Result<SessionSeed, GateRejection> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GateRejection::MissingCredential)?;

        let user = self.verifier.verify(token).await.map_err(|e| match e {
            AuthError::ServiceUnavailable(msg) => {
                tracing::error!(%document_id, error = %msg, "token verification unavailable");
                GateRejection::ServiceUnavailable(msg)
            }
            other => {
                tracing::debug!(%document_id, error = %other, "credential rejected");
                GateRejection::InvalidCredential
            }
        })?;

        let document = self
            .access
            .find_accessible(&user.id, &document_id)
            .await
            .map_err(|e| {
                tracing::error!(%document_id, user_id = %user.id, error = %e, "grant lookup failed");
                GateRejection::ServiceUnavailable(e.to_string())
            })?
            .ok_or_else(|| {
                tracing::debug!(%document_id, user_id = %user.id, "no ownership or grant");
                GateRejection::AccessDenied
            })?;

        Ok(SessionSeed {
            document_id: document.id,
            user,
            initial_content: document.content,
        })
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}
