//! Collaborator traits consulted by the gate.
//!
//! All calls are asynchronous and read-only. An `Err` from any of them is a
//! fault of the collaborator, never an access decision.

use async_trait::async_trait;
use classgate_security::RawClaims;

use crate::error::{StoreError, VerifierError};
use crate::models::{Project, TenantPolicy};

/// Session records for members of the reserved session tenant.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Check whether `token` belongs to a live session of `member_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record store itself fails. A token
    /// that simply does not match is `Ok(false)`.
    async fn check_session_token(&self, member_id: &str, token: &str) -> Result<bool, StoreError>;
}

/// Project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch a project snapshot by id; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;
}

/// Per-tenant policy records.
#[async_trait]
pub trait TenantPolicyStore: Send + Sync {
    /// Fetch the policy of a tenant (class).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails, including when the store
    /// has no record for `tenant_id`.
    async fn get_class_tenant(&self, tenant_id: &str) -> Result<TenantPolicy, StoreError>;
}

/// Verifies identity-provider bearer tokens.
///
/// ```ignore
/// let raw = verifier.verify(bearer).await?;
/// let principal = normalizer.normalize(raw);
/// ```
#[async_trait]
pub trait ExternalVerifier: Send + Sync {
    /// Verify signature and registered claims, returning the raw claim set.
    ///
    /// # Arguments
    ///
    /// * `bearer_token` - The raw token string (without "Bearer " prefix)
    ///
    /// # Errors
    ///
    /// - `Rejected` if the token is malformed, expired, or fails verification
    /// - `Unavailable` if key material cannot be obtained
    /// - `Internal` for unexpected errors
    async fn verify(&self, bearer_token: &str) -> Result<RawClaims, VerifierError>;
}
