use classgate_sdk::Project;
use classgate_security::Principal;

use super::error::GateFault;

/// What the gate sees of an incoming request.
///
/// Path segments are already resolved from the deployment's parameter names.
#[derive(Debug, Clone, Default)]
pub struct GateRequest {
    tenant: Option<String>,
    member: Option<String>,
    project: Option<String>,
    authorization: Option<String>,
}

impl GateRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    #[must_use]
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    #[must_use]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Raw `Authorization` header value.
    #[must_use]
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    #[must_use]
    pub fn tenant_segment(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    #[must_use]
    pub fn member_segment(&self) -> Option<&str> {
        self.member.as_deref()
    }

    #[must_use]
    pub fn project_segment(&self) -> Option<&str> {
        self.project.as_deref()
    }

    #[must_use]
    pub fn authorization_header(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Bearer token from the `Authorization` header, if it uses that scheme.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.authorization
            .as_deref()
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// # Errors
    ///
    /// Returns [`GateFault::MissingPathParam`] when the route has no tenant segment.
    pub fn require_tenant(&self) -> Result<&str, GateFault> {
        self.tenant_segment()
            .ok_or(GateFault::MissingPathParam("tenant"))
    }

    /// # Errors
    ///
    /// Returns [`GateFault::MissingPathParam`] when the route has no project segment.
    pub fn require_project(&self) -> Result<&str, GateFault> {
        self.project_segment()
            .ok_or(GateFault::MissingPathParam("project"))
    }
}

/// Request-scoped, append-only context shared by the stages of one request.
///
/// Each value can be attached once; stages after the one that attached it
/// only read it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    principal: Option<Principal>,
    project: Option<Project>,
}

impl RequestContext {
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[must_use]
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// # Errors
    ///
    /// Returns [`GateFault::AlreadyAttached`] if a principal is already present.
    pub fn attach_principal(&mut self, principal: Principal) -> Result<(), GateFault> {
        if self.principal.is_some() {
            return Err(GateFault::AlreadyAttached("principal"));
        }
        self.principal = Some(principal);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GateFault::AlreadyAttached`] if a project is already present.
    pub fn attach_project(&mut self, project: Project) -> Result<(), GateFault> {
        if self.project.is_some() {
            return Err(GateFault::AlreadyAttached("project"));
        }
        self.project = Some(project);
        Ok(())
    }
}
