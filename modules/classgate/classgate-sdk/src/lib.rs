#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! classgate SDK
//!
//! Contracts between the gate and the systems it consults:
//!
//! - [`SessionStore`] - live session records for the reserved session tenant
//! - [`ProjectStore`] - project lookup by id
//! - [`TenantPolicyStore`] - per-tenant management policy
//! - [`ExternalVerifier`] - identity-provider token verification
//! - [`Project`], [`TenantPolicy`], [`SessionToken`] - models
//! - [`StoreError`], [`VerifierError`] - error types
//!
//! ## Usage
//!
//! ```ignore
//! use classgate_sdk::ProjectStore;
//!
//! let project = projects.get_project("proj-1").await?;
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::{ExternalVerifier, ProjectStore, SessionStore, TenantPolicyStore};
pub use error::{StoreError, VerifierError};
pub use models::{Project, SessionToken, TenantPolicy};
