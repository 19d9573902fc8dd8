//! Wiring of gate stages from configuration and collaborators.

use std::sync::Arc;

use classgate_sdk::{ExternalVerifier, ProjectStore, SessionStore, TenantPolicyStore};
use classgate_security::ClaimsNormalizer;

use crate::api::rest::GateLayer;
use crate::config::{ClassGateConfig, ConfigError, PathParamNames};
use crate::domain::authn::AuthenticationRouter;
use crate::domain::authz::{SiteAdminOnly, SupervisorOnly, TenantMatch, UnmanagedTenantRequired};
use crate::domain::pipeline::{Pipeline, Stage};
use crate::domain::project_access::ProjectAccessController;
use crate::domain::session::SessionTokenVerifier;

/// Record stores the gate reads from.
#[derive(Clone)]
pub struct GateStores {
    pub sessions: Arc<dyn SessionStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub tenant_policies: Arc<dyn TenantPolicyStore>,
}

/// Stage factory. Stages are shared between every chain built from one gate.
#[derive(Clone)]
pub struct Gate {
    authenticate: Arc<AuthenticationRouter>,
    unmanaged_tenant: Arc<UnmanagedTenantRequired>,
    owner_only: Arc<ProjectAccessController>,
    owner_or_shared: Arc<ProjectAccessController>,
    path_params: PathParamNames,
}

impl Gate {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` does not validate.
    pub fn new(
        config: &ClassGateConfig,
        stores: GateStores,
        external: Arc<dyn ExternalVerifier>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let normalizer =
            ClaimsNormalizer::new(&config.claims.role_claim, &config.claims.tenant_claim);
        let session = SessionTokenVerifier::new(stores.sessions, &config.session_tenant);
        let authenticate =
            AuthenticationRouter::new(&config.session_tenant, session, external, normalizer);

        tracing::info!(
            session_tenant = %config.session_tenant,
            issuer = %config.identity_provider.issuer,
            "classgate configured"
        );

        Ok(Self {
            authenticate: Arc::new(authenticate),
            unmanaged_tenant: Arc::new(UnmanagedTenantRequired::new(stores.tenant_policies)),
            owner_only: Arc::new(ProjectAccessController::owner_only(stores.projects.clone())),
            owner_or_shared: Arc::new(ProjectAccessController::owner_or_shared(stores.projects)),
            path_params: config.path_params.clone(),
        })
    }

    /// Start an empty chain of stages.
    #[must_use]
    pub fn chain(&self) -> GateChain<'_> {
        GateChain {
            gate: self,
            pipeline: Pipeline::default(),
        }
    }
}

/// Ordered list of stages for one route.
#[must_use]
pub struct GateChain<'a> {
    gate: &'a Gate,
    pipeline: Pipeline,
}

impl GateChain<'_> {
    pub fn authenticate(self) -> Self {
        let stage = self.gate.authenticate.clone();
        self.then(stage)
    }

    pub fn tenant_match(self) -> Self {
        self.then(Arc::new(TenantMatch))
    }

    pub fn supervisor_only(self) -> Self {
        self.then(Arc::new(SupervisorOnly))
    }

    pub fn site_admin_only(self) -> Self {
        self.then(Arc::new(SiteAdminOnly))
    }

    pub fn unmanaged_tenant_required(self) -> Self {
        let stage = self.gate.unmanaged_tenant.clone();
        self.then(stage)
    }

    pub fn owner_only(self) -> Self {
        let stage = self.gate.owner_only.clone();
        self.then(stage)
    }

    pub fn owner_or_shared(self) -> Self {
        let stage = self.gate.owner_or_shared.clone();
        self.then(stage)
    }

    /// Append a custom stage.
    pub fn then(mut self, stage: Arc<dyn Stage>) -> Self {
        self.pipeline = self.pipeline.then(stage);
        self
    }

    pub fn pipeline(self) -> Pipeline {
        self.pipeline
    }

    pub fn layer(self) -> GateLayer {
        GateLayer::new(self.pipeline, self.gate.path_params.clone())
    }
}
