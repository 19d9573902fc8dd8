//! Error types for classgate collaborators.

use thiserror::Error;

/// Failures of a record store (sessions, projects, tenant policy).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A record the store is required to hold is missing.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by an [`ExternalVerifier`](crate::ExternalVerifier).
#[derive(Debug, Clone, Error)]
pub enum VerifierError {
    /// The token is invalid, expired, or malformed.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// Key material could not be obtained.
    #[error("verifier unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VerifierError {
    /// Whether the error is a verdict on the token rather than a verifier failure.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
