//! Gate outcomes as HTTP responses.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use super::problem::Problem;
use crate::domain::error::{ForbiddenReason, GateError, GateFault, Rejection};

impl From<Rejection> for Problem {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Unauthenticated => Problem::new(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Missing or invalid credentials",
            )
            .with_code("unauthenticated"),
            Rejection::Forbidden(reason) => {
                Problem::new(StatusCode::FORBIDDEN, "Forbidden", forbidden_detail(reason))
                    .with_code(reason.code())
            }
            Rejection::NotFound => Problem::new(
                StatusCode::NOT_FOUND,
                "Not Found",
                "Requested resource does not exist",
            )
            .with_code("not_found"),
        }
    }
}

fn forbidden_detail(reason: ForbiddenReason) -> &'static str {
    match reason {
        ForbiddenReason::TenantMismatch => "Caller does not belong to the requested class",
        ForbiddenReason::SupervisorRequired => "Supervisor role required",
        ForbiddenReason::SiteAdminRequired => "Site administrator role required",
        ForbiddenReason::ManagedTenant => "Operation is disabled for managed classes",
        ForbiddenReason::NotOwner => "Caller may not access this project",
        ForbiddenReason::ProjectTenantMismatch => "Project does not belong to the requested class",
    }
}

/// Faults never expose their cause to the caller.
impl From<&GateFault> for Problem {
    fn from(_: &GateFault) -> Self {
        Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An internal error occurred",
        )
        .with_code("internal")
    }
}

impl From<&GateError> for Problem {
    fn from(err: &GateError) -> Self {
        match err {
            GateError::Rejected(rejection) => (*rejection).into(),
            GateError::Fault(fault) => fault.into(),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        Problem::from(&self).into_response()
    }
}
