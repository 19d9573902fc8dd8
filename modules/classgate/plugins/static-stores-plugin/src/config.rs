//! Configuration for the static stores plugin.

use classgate_sdk::{Project, TenantPolicy};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticStoresConfig {
    /// Live sessions of session-tenant members.
    pub sessions: Vec<SessionRecord>,

    pub projects: Vec<Project>,

    /// Policy for every tenant that may be asked about. Unlisted tenants are
    /// reported as missing records.
    pub tenants: Vec<TenantPolicy>,
}

/// One live session.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionRecord {
    pub member_id: String,
    pub token: String,
}
