//! Extractors for values the gate attached to the request.

use axum::extract::FromRequestParts;
use classgate_sdk::Project;
use classgate_security::Principal;
use http::request::Parts;

use crate::domain::context::RequestContext;
use crate::domain::error::{GateError, GateFault};

/// The authenticated caller. Fails with a 500 when no gate layer authenticated the route.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(RequestContext::principal)
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| not_attached("principal"))
    }
}

/// The project resolved by a project-access stage.
#[derive(Debug, Clone)]
pub struct ResolvedProject(pub Project);

impl<S> FromRequestParts<S> for ResolvedProject
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(RequestContext::project)
            .cloned()
            .map(ResolvedProject)
            .ok_or_else(|| not_attached("project"))
    }
}

fn not_attached(what: &'static str) -> GateError {
    let fault = GateFault::NotAttached(what);
    tracing::error!(error = %fault, "handler extractor misconfigured");
    fault.into()
}
