//! Lookup tables built from [`StaticStoresConfig`].

use std::collections::{HashMap, HashSet};

use classgate_sdk::{Project, TenantPolicy};

use crate::config::StaticStoresConfig;

/// In-memory session, project and tenant-policy records.
pub struct StaticStores {
    sessions: HashSet<(String, String)>,
    projects: HashMap<String, Project>,
    tenants: HashMap<String, TenantPolicy>,
}

impl StaticStores {
    /// Build the tables. Later duplicates of a project or tenant win.
    #[must_use]
    pub fn from_config(cfg: &StaticStoresConfig) -> Self {
        let sessions = cfg
            .sessions
            .iter()
            .map(|s| (s.member_id.clone(), s.token.clone()))
            .collect();
        let projects = cfg
            .projects
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        let tenants = cfg
            .tenants
            .iter()
            .map(|t| (t.tenant.clone(), t.clone()))
            .collect();

        Self {
            sessions,
            projects,
            tenants,
        }
    }

    #[must_use]
    pub fn is_live_session(&self, member_id: &str, token: &str) -> bool {
        self.sessions
            .contains(&(member_id.to_owned(), token.to_owned()))
    }

    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.get(project_id)
    }

    #[must_use]
    pub fn tenant_policy(&self, tenant_id: &str) -> Option<&TenantPolicy> {
        self.tenants.get(tenant_id)
    }
}
