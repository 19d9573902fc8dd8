//! Gate outcomes: rejections end the chain with a response, faults go to the
//! surrounding error pipeline.

use classgate_sdk::{StoreError, VerifierError};
use thiserror::Error;

/// Why a valid caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// Principal tenant differs from the requested tenant.
    TenantMismatch,
    SupervisorRequired,
    SiteAdminRequired,
    /// The requested tenant is externally managed.
    ManagedTenant,
    /// Caller neither owns the project nor may read it as shared.
    NotOwner,
    /// The project lives in a different tenant than the one addressed.
    ProjectTenantMismatch,
}

impl ForbiddenReason {
    /// Machine-readable code used in problem responses.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TenantMismatch => "tenant_mismatch",
            Self::SupervisorRequired => "supervisor_required",
            Self::SiteAdminRequired => "site_admin_required",
            Self::ManagedTenant => "managed_tenant",
            Self::NotOwner => "not_owner",
            Self::ProjectTenantMismatch => "project_tenant_mismatch",
        }
    }
}

/// Terminal, locally produced refusal. Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: {}", .0.code())]
    Forbidden(ForbiddenReason),

    #[error("not found")]
    NotFound,
}

/// Unexpected failure of a collaborator or of the route wiring.
#[derive(Debug, Error)]
pub enum GateFault {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("verifier error: {0}")]
    Verifier(VerifierError),

    #[error("route does not supply path parameter '{0}'")]
    MissingPathParam(&'static str),

    #[error("{0} is already attached to the request context")]
    AlreadyAttached(&'static str),

    #[error("{0} is not attached to the request context; gate layer not configured for this route")]
    NotAttached(&'static str),
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Fault(#[from] GateFault),
}

impl GateError {
    #[must_use]
    pub const fn forbidden(reason: ForbiddenReason) -> Self {
        Self::Rejected(Rejection::Forbidden(reason))
    }

    /// The rejection, if this is not a fault.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            Self::Fault(_) => None,
        }
    }
}

impl From<StoreError> for GateError {
    fn from(e: StoreError) -> Self {
        Self::Fault(GateFault::Store(e))
    }
}

/// Verifier rejections are authentication failures; anything else is a fault.
impl From<VerifierError> for GateError {
    fn from(e: VerifierError) -> Self {
        if e.is_rejection() {
            tracing::debug!(error = %e, "identity provider token rejected");
            Self::Rejected(Rejection::Unauthenticated)
        } else {
            Self::Fault(GateFault::Verifier(e))
        }
    }
}
