use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::role::Role;

/// Session material carried by principals authenticated on the session path.
///
/// The token is wrapped in `SecretString` so `Debug` redacts it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionInfo {
    session_id: String,
    #[serde(skip)]
    token: SecretString,
}

impl SessionInfo {
    #[must_use]
    pub fn new(session_id: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            session_id: session_id.into(),
            token: token.into(),
        }
    }

    /// Identifier of the session the token was issued for.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Opaque session token material.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

/// `Principal` is the authenticated caller of one request.
///
/// Built exactly once per request by the authentication stage and never
/// mutated afterwards; later stages only read it. `role` and `tenant` are
/// already normalized, whichever claim shape the token used.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Principal {
    /// Stable unique identifier of the caller.
    subject: String,
    /// Role inside the tenant, if the token asserted a known one.
    role: Option<Role>,
    /// Tenant (class) the token asserts membership in.
    tenant: Option<String>,
    /// Present only for session-path principals.
    session: Option<SessionInfo>,
    /// Raw claim set the principal was normalized from.
    #[serde(skip)]
    claims: Map<String, Value>,
}

impl Principal {
    #[must_use]
    pub fn builder(subject: impl Into<String>) -> PrincipalBuilder {
        PrincipalBuilder {
            subject: subject.into(),
            role: None,
            tenant: None,
            session: None,
            claims: Map::new(),
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// True when the principal carries neither a role nor a tenant.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.role.is_none() && self.tenant.is_none()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        Option<Role>,
        Option<String>,
        Option<SessionInfo>,
        Map<String, Value>,
    ) {
        (
            self.subject,
            self.role,
            self.tenant,
            self.session,
            self.claims,
        )
    }
}

pub struct PrincipalBuilder {
    subject: String,
    role: Option<Role>,
    tenant: Option<String>,
    session: Option<SessionInfo>,
    claims: Map<String, Value>,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn maybe_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    #[must_use]
    pub fn maybe_tenant(mut self, tenant: Option<String>) -> Self {
        self.tenant = tenant;
        self
    }

    #[must_use]
    pub fn session(mut self, session: SessionInfo) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub fn maybe_session(mut self, session: Option<SessionInfo>) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn claims(mut self, claims: Map<String, Value>) -> Self {
        self.claims = claims;
        self
    }

    #[must_use]
    pub fn build(self) -> Principal {
        Principal {
            subject: self.subject,
            role: self.role,
            tenant: self.tenant,
            session: self.session,
            claims: self.claims,
        }
    }
}
