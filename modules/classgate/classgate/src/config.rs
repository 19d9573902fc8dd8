//! Gate configuration.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("path parameter name '{0}' is used for more than one segment")]
    DuplicatePathParam(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassGateConfig {
    /// Tenant whose members authenticate with locally issued session tokens.
    pub session_tenant: String,

    pub identity_provider: IdentityProviderConfig,

    pub claims: ClaimsConfig,

    pub path_params: PathParamNames,

    /// HMAC secret for issuing session tokens. Not needed to verify them.
    pub session_signing_secret: Option<SecretString>,
}

impl Default for ClassGateConfig {
    fn default() -> Self {
        Self {
            session_tenant: "open".to_owned(),
            identity_provider: IdentityProviderConfig::default(),
            claims: ClaimsConfig::default(),
            path_params: PathParamNames::default(),
            session_signing_secret: None,
        }
    }
}

impl ClassGateConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty session tenant, issuer, audience,
    /// claim key, or path parameter name, and for path parameter names used twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("session_tenant", &self.session_tenant)?;
        non_empty("identity_provider.issuer", &self.identity_provider.issuer)?;
        non_empty("identity_provider.audience", &self.identity_provider.audience)?;
        non_empty("claims.role_claim", &self.claims.role_claim)?;
        non_empty("claims.tenant_claim", &self.claims.tenant_claim)?;

        let params = &self.path_params;
        non_empty("path_params.tenant", &params.tenant)?;
        non_empty("path_params.member", &params.member)?;
        non_empty("path_params.project", &params.project)?;

        let mut seen = HashSet::new();
        for name in [&params.tenant, &params.member, &params.project] {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicatePathParam(name.clone()));
            }
        }
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty(field))
    } else {
        Ok(())
    }
}

/// External identity provider. Tokens are always RS256.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityProviderConfig {
    pub issuer: String,

    pub audience: String,

    /// JSON Web Key Set file, re-read on refresh.
    pub jwks_path: Option<PathBuf>,

    /// Minimum seconds between two key-set refreshes.
    pub jwks_min_refresh_secs: u64,

    /// Clock skew tolerated on `exp` and `nbf`.
    pub leeway_secs: u64,
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            jwks_path: None,
            jwks_min_refresh_secs: 30,
            leeway_secs: 60,
        }
    }
}

impl IdentityProviderConfig {
    #[must_use]
    pub fn jwks_min_refresh(&self) -> Duration {
        Duration::from_secs(self.jwks_min_refresh_secs)
    }
}

/// Namespaced claim keys the identity provider uses for role and tenant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClaimsConfig {
    pub role_claim: String,
    pub tenant_claim: String,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            role_claim: "https://classgate.dev/role".to_owned(),
            tenant_claim: "https://classgate.dev/tenant".to_owned(),
        }
    }
}

/// Route parameter names for the tenant, member and project segments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathParamNames {
    pub tenant: String,
    pub member: String,
    pub project: String,
}

impl Default for PathParamNames {
    fn default() -> Self {
        Self {
            tenant: "class_id".to_owned(),
            member: "student_id".to_owned(),
            project: "project_id".to_owned(),
        }
    }
}
