//! Project resolution with tenant isolation and ownership rules.

use std::sync::Arc;

use async_trait::async_trait;
use classgate_sdk::{Project, ProjectStore};
use classgate_security::Principal;

use super::context::{GateRequest, RequestContext};
use super::error::{ForbiddenReason, GateError, Rejection};
use super::pipeline::{Outcome, Stage};

/// Whether non-owners may pass on crowd-sourced projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedAccess {
    Denied,
    Allowed,
}

/// Ownership requires the token subject and the member path segment to both
/// name the project owner.
#[must_use]
pub fn is_owner(project: &Project, principal: Option<&Principal>, member: Option<&str>) -> bool {
    principal.is_some_and(|p| project.owner_id == p.subject())
        && member == Some(project.owner_id.as_str())
}

/// Decide access to an already fetched project.
///
/// # Errors
///
/// - `NotFound` when there is no project
/// - `Forbidden(ProjectTenantMismatch)` when the project lives in another tenant
/// - `Forbidden(NotOwner)` when the caller is not the owner and shared access
///   does not apply
pub fn decide(
    project: Option<&Project>,
    tenant: &str,
    principal: Option<&Principal>,
    member: Option<&str>,
    shared: SharedAccess,
) -> Result<(), Rejection> {
    let project = project.ok_or(Rejection::NotFound)?;

    if project.tenant != tenant {
        return Err(Rejection::Forbidden(ForbiddenReason::ProjectTenantMismatch));
    }

    if is_owner(project, principal, member)
        || (shared == SharedAccess::Allowed && project.is_crowd_sourced)
    {
        Ok(())
    } else {
        Err(Rejection::Forbidden(ForbiddenReason::NotOwner))
    }
}

/// Resolves the addressed project and attaches it to the request context.
pub struct ProjectAccessController {
    store: Arc<dyn ProjectStore>,
    shared: SharedAccess,
}

impl ProjectAccessController {
    /// Only the owner passes.
    #[must_use]
    pub fn owner_only(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            shared: SharedAccess::Denied,
        }
    }

    /// The owner passes; so does anyone in the tenant when the project is
    /// crowd-sourced.
    #[must_use]
    pub fn owner_or_shared(store: Arc<dyn ProjectStore>) -> Self {
        Self {
            store,
            shared: SharedAccess::Allowed,
        }
    }

    #[must_use]
    pub fn shared_access(&self) -> SharedAccess {
        self.shared
    }

    /// Fetch the project named by the path and decide access to it.
    ///
    /// # Errors
    ///
    /// Rejections per [`decide`]; a missing path segment or a store failure is a fault.
    #[tracing::instrument(
        skip_all,
        fields(project = request.project_segment(), shared = ?self.shared)
    )]
    pub async fn resolve(
        &self,
        request: &GateRequest,
        principal: Option<&Principal>,
    ) -> Result<Project, GateError> {
        let tenant = request.require_tenant()?;
        let project_id = request.require_project()?;

        let project = self.store.get_project(project_id).await?;
        decide(
            project.as_ref(),
            tenant,
            principal,
            request.member_segment(),
            self.shared,
        )?;

        project.ok_or_else(|| Rejection::NotFound.into())
    }
}

#[async_trait]
impl Stage for ProjectAccessController {
    fn name(&self) -> &'static str {
        match self.shared {
            SharedAccess::Denied => "project_owner_only",
            SharedAccess::Allowed => "project_owner_or_shared",
        }
    }

    async fn run(&self, request: &GateRequest, ctx: &mut RequestContext) -> Outcome {
        let result = match self.resolve(request, ctx.principal()).await {
            Ok(project) => ctx.attach_project(project).map_err(GateError::from),
            Err(err) => Err(err),
        };
        result.into()
    }
}
