//! Tenant and role checks. Each check is its own stage so routes can chain
//! only what they need.

use std::sync::Arc;

use async_trait::async_trait;
use classgate_sdk::TenantPolicyStore;
use classgate_security::{Principal, Role};

use super::context::{GateRequest, RequestContext};
use super::error::{ForbiddenReason, GateError, Rejection};
use super::pipeline::{Outcome, Stage};

/// Principal must belong to the tenant addressed by the path.
///
/// # Errors
///
/// `Unauthenticated` without a principal or when the principal carries neither
/// role nor tenant; `Forbidden(TenantMismatch)` when the tenants differ.
pub fn check_tenant_match(principal: Option<&Principal>, tenant: &str) -> Result<(), Rejection> {
    let Some(principal) = principal.filter(|p| !p.is_bare()) else {
        return Err(Rejection::Unauthenticated);
    };
    if principal.tenant() == Some(tenant) {
        Ok(())
    } else {
        Err(Rejection::Forbidden(ForbiddenReason::TenantMismatch))
    }
}

/// # Errors
///
/// `Forbidden(SupervisorRequired)` for any role but supervisor.
pub fn check_supervisor(principal: Option<&Principal>) -> Result<(), Rejection> {
    require_role(principal, Role::Supervisor, ForbiddenReason::SupervisorRequired)
}

/// # Errors
///
/// `Forbidden(SiteAdminRequired)` for any role but site admin.
pub fn check_site_admin(principal: Option<&Principal>) -> Result<(), Rejection> {
    require_role(principal, Role::SiteAdmin, ForbiddenReason::SiteAdminRequired)
}

fn require_role(
    principal: Option<&Principal>,
    role: Role,
    reason: ForbiddenReason,
) -> Result<(), Rejection> {
    if principal.and_then(Principal::role) == Some(role) {
        Ok(())
    } else {
        Err(Rejection::Forbidden(reason))
    }
}

pub struct TenantMatch;

#[async_trait]
impl Stage for TenantMatch {
    fn name(&self) -> &'static str {
        "tenant_match"
    }

    async fn run(&self, request: &GateRequest, ctx: &mut RequestContext) -> Outcome {
        let tenant = match request.require_tenant() {
            Ok(tenant) => tenant,
            Err(fault) => return Outcome::Fault(fault),
        };
        check_tenant_match(ctx.principal(), tenant)
            .map_err(GateError::from)
            .into()
    }
}

pub struct SupervisorOnly;

#[async_trait]
impl Stage for SupervisorOnly {
    fn name(&self) -> &'static str {
        "supervisor_only"
    }

    async fn run(&self, _request: &GateRequest, ctx: &mut RequestContext) -> Outcome {
        check_supervisor(ctx.principal()).map_err(GateError::from).into()
    }
}

/// Usable anywhere after authentication; does not depend on tenant-match.
pub struct SiteAdminOnly;

#[async_trait]
impl Stage for SiteAdminOnly {
    fn name(&self) -> &'static str {
        "site_admin_only"
    }

    async fn run(&self, _request: &GateRequest, ctx: &mut RequestContext) -> Outcome {
        check_site_admin(ctx.principal()).map_err(GateError::from).into()
    }
}

/// Blocks self-service features for externally managed tenants.
pub struct UnmanagedTenantRequired {
    store: Arc<dyn TenantPolicyStore>,
}

impl UnmanagedTenantRequired {
    #[must_use]
    pub fn new(store: Arc<dyn TenantPolicyStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// `Forbidden(ManagedTenant)` for a managed tenant; a store failure is a fault.
    pub async fn check(&self, tenant: &str) -> Result<(), GateError> {
        let policy = self.store.get_class_tenant(tenant).await?;
        if policy.is_managed {
            Err(GateError::forbidden(ForbiddenReason::ManagedTenant))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Stage for UnmanagedTenantRequired {
    fn name(&self) -> &'static str {
        "unmanaged_tenant_required"
    }

    async fn run(&self, request: &GateRequest, _ctx: &mut RequestContext) -> Outcome {
        match request.require_tenant() {
            Ok(tenant) => self.check(tenant).await.into(),
            Err(fault) => Outcome::Fault(fault),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::HashMap;

    use classgate_sdk::{StoreError, TenantPolicy};

    use super::*;
    use crate::domain::error::GateFault;

    fn principal(role: Option<Role>, tenant: Option<&str>) -> Principal {
        Principal::builder("auth0|p")
            .maybe_role(role)
            .maybe_tenant(tenant.map(str::to_owned))
            .build()
    }

    #[test]
    fn tenant_match_passes_on_equal_tenant() {
        let p = principal(Some(Role::Student), Some("class-1"));
        assert_eq!(check_tenant_match(Some(&p), "class-1"), Ok(()));
    }

    #[test]
    fn tenant_match_forbids_other_tenants() {
        let p = principal(Some(Role::Supervisor), Some("class-1"));
        assert_eq!(
            check_tenant_match(Some(&p), "class-2"),
            Err(Rejection::Forbidden(ForbiddenReason::TenantMismatch))
        );

        let no_tenant = principal(Some(Role::Supervisor), None);
        assert_eq!(
            check_tenant_match(Some(&no_tenant), "class-1"),
            Err(Rejection::Forbidden(ForbiddenReason::TenantMismatch))
        );
    }

    #[test]
    fn tenant_match_without_identity_is_unauthenticated() {
        assert_eq!(
            check_tenant_match(None, "class-1"),
            Err(Rejection::Unauthenticated)
        );
        assert_eq!(
            check_tenant_match(Some(&principal(None, None)), "class-1"),
            Err(Rejection::Unauthenticated)
        );
    }

    #[test]
    fn supervisor_only_rejects_every_other_role() {
        let supervisor = principal(Some(Role::Supervisor), Some("class-1"));
        assert_eq!(check_supervisor(Some(&supervisor)), Ok(()));

        for role in [None, Some(Role::Student), Some(Role::SiteAdmin)] {
            let p = principal(role, Some("class-1"));
            assert_eq!(
                check_supervisor(Some(&p)),
                Err(Rejection::Forbidden(ForbiddenReason::SupervisorRequired)),
                "role {role:?}"
            );
        }
    }

    #[test]
    fn site_admin_only_rejects_every_other_role() {
        let admin = principal(Some(Role::SiteAdmin), None);
        assert_eq!(check_site_admin(Some(&admin)), Ok(()));

        for role in [None, Some(Role::Student), Some(Role::Supervisor)] {
            assert_eq!(
                check_site_admin(Some(&principal(role, None))),
                Err(Rejection::Forbidden(ForbiddenReason::SiteAdminRequired))
            );
        }
        assert!(check_site_admin(None).is_err());
    }

    #[tokio::test]
    async fn tenant_match_stage_faults_without_tenant_segment() {
        let mut ctx = RequestContext::default();
        ctx.attach_principal(principal(Some(Role::Student), Some("class-1")))
            .unwrap();

        let outcome = TenantMatch.run(&GateRequest::new(), &mut ctx).await;

        assert!(matches!(
            outcome,
            Outcome::Fault(GateFault::MissingPathParam("tenant"))
        ));
    }

    struct Policies {
        managed: HashMap<String, bool>,
        fail: bool,
    }

    #[async_trait]
    impl TenantPolicyStore for Policies {
        async fn get_class_tenant(&self, tenant_id: &str) -> Result<TenantPolicy, StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("policy db down".to_owned()));
            }
            self.managed
                .get(tenant_id)
                .map(|is_managed| TenantPolicy {
                    tenant: tenant_id.to_owned(),
                    is_managed: *is_managed,
                })
                .ok_or_else(|| StoreError::NotFound(tenant_id.to_owned()))
        }
    }

    fn policies(fail: bool) -> Arc<Policies> {
        Arc::new(Policies {
            managed: HashMap::from([
                ("managed-class".to_owned(), true),
                ("self-run-class".to_owned(), false),
            ]),
            fail,
        })
    }

    #[tokio::test]
    async fn managed_tenant_is_forbidden() {
        let stage = UnmanagedTenantRequired::new(policies(false));
        let mut ctx = RequestContext::default();

        let outcome = stage
            .run(&GateRequest::new().tenant("managed-class"), &mut ctx)
            .await;
        assert!(matches!(
            outcome,
            Outcome::Reject(Rejection::Forbidden(ForbiddenReason::ManagedTenant))
        ));

        let outcome = stage
            .run(&GateRequest::new().tenant("self-run-class"), &mut ctx)
            .await;
        assert!(matches!(outcome, Outcome::Continue));
    }

    #[tokio::test]
    async fn policy_store_fault_is_not_forbidden() {
        let stage = UnmanagedTenantRequired::new(policies(true));

        let err = stage.check("managed-class").await.unwrap_err();

        assert!(matches!(err, GateError::Fault(GateFault::Store(_))));
    }

    #[tokio::test]
    async fn unknown_tenant_policy_is_a_fault() {
        let stage = UnmanagedTenantRequired::new(policies(false));

        let err = stage.check("nowhere").await.unwrap_err();

        assert!(matches!(
            err,
            GateError::Fault(GateFault::Store(StoreError::NotFound(_)))
        ));
    }
}
