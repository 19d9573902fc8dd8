//! Store contracts implemented over [`StaticStores`].

use async_trait::async_trait;
use classgate_sdk::{
    Project, ProjectStore, SessionStore, StoreError, TenantPolicy, TenantPolicyStore,
};

use super::service::StaticStores;

#[async_trait]
impl SessionStore for StaticStores {
    async fn check_session_token(&self, member_id: &str, token: &str) -> Result<bool, StoreError> {
        Ok(self.is_live_session(member_id, token))
    }
}

#[async_trait]
impl ProjectStore for StaticStores {
    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.project(project_id).cloned())
    }
}

#[async_trait]
impl TenantPolicyStore for StaticStores {
    async fn get_class_tenant(&self, tenant_id: &str) -> Result<TenantPolicy, StoreError> {
        self.tenant_policy(tenant_id).cloned().ok_or_else(|| {
            tracing::warn!(tenant_id, "no static policy configured for tenant");
            StoreError::NotFound(format!("tenant policy '{tenant_id}'"))
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::StaticStoresConfig;

    fn stores() -> StaticStores {
        StaticStores::from_config(
            &serde_json::from_value::<StaticStoresConfig>(serde_json::json!({
                "sessions": [{ "member_id": "stu-1", "token": "tok-1" }],
                "projects": [{ "id": "p-1", "tenant": "open", "owner_id": "stu-1" }],
                "tenants": [{ "tenant": "class-1", "is_managed": true }]
            }))
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn session_store_trait() {
        let stores = stores();
        let sessions: &dyn SessionStore = &stores;

        assert!(sessions.check_session_token("stu-1", "tok-1").await.unwrap());
        assert!(!sessions.check_session_token("stu-1", "nope").await.unwrap());
    }

    #[tokio::test]
    async fn project_store_trait_reports_absence() {
        let stores = stores();
        let projects: &dyn ProjectStore = &stores;

        assert_eq!(
            projects.get_project("p-1").await.unwrap().unwrap().owner_id,
            "stu-1"
        );
        assert!(projects.get_project("p-9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_tenant_policy_is_not_found() {
        let stores = stores();
        let policies: &dyn TenantPolicyStore = &stores;

        assert!(policies.get_class_tenant("class-1").await.unwrap().is_managed);
        match policies.get_class_tenant("class-9").await.unwrap_err() {
            StoreError::NotFound(_) => {}
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }
}
