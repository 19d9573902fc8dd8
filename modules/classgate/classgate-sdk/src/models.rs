//! Domain models shared with collaborators.

use serde::{Deserialize, Serialize};

/// A project snapshot, fetched fresh per request.
///
/// Every project belongs to exactly one tenant and has one exclusive owner.
/// `is_crowd_sourced` is the only way non-owners of the same tenant gain access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: String,
    pub tenant: String,
    pub owner_id: String,
    #[serde(default)]
    pub is_crowd_sourced: bool,
}

/// Management policy of a tenant (class).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantPolicy {
    pub tenant: String,
    /// Externally administered; some self-service features are disabled.
    #[serde(default)]
    pub is_managed: bool,
}

/// Payload of a session-protocol token. Untrusted until the session store
/// confirms it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: String,
    pub token: String,
}
