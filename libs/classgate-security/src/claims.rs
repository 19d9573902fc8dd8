//! Claim normalization.
//!
//! Tokens reach the gate in two shapes: session-path tokens already carry a
//! structured role/tenant pair, while identity-provider tokens carry them under
//! vendor-namespaced custom claim keys. [`ClaimsNormalizer`] folds both shapes
//! into a single [`Principal`].

use serde_json::{Map, Value};

use crate::principal::{Principal, SessionInfo};
use crate::role::Role;

/// Errors raised while reading a claim set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimsError {
    #[error("missing or empty 'sub' claim")]
    MissingSubject,
}

/// Claims as they come off a verified token, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawClaims {
    pub subject: String,
    pub role: Option<Role>,
    pub tenant: Option<String>,
    pub session: Option<SessionInfo>,
    /// Every claim of the token except `sub`.
    pub custom: Map<String, Value>,
}

impl RawClaims {
    /// Split a decoded JSON claim set into the subject and the remaining claims.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::MissingSubject`] when `sub` is absent, not a string, or empty.
    pub fn from_claim_map(mut claims: Map<String, Value>) -> Result<Self, ClaimsError> {
        let subject = match claims.remove("sub") {
            Some(Value::String(sub)) if !sub.is_empty() => sub,
            _ => return Err(ClaimsError::MissingSubject),
        };

        Ok(Self {
            subject,
            custom: claims,
            ..Self::default()
        })
    }
}

impl From<Principal> for RawClaims {
    fn from(principal: Principal) -> Self {
        let (subject, role, tenant, session, custom) = principal.into_parts();
        Self {
            subject,
            role,
            tenant,
            session,
            custom,
        }
    }
}

/// Reads role and tenant out of vendor-namespaced claim keys.
#[derive(Debug, Clone)]
pub struct ClaimsNormalizer {
    role_claim: String,
    tenant_claim: String,
}

impl ClaimsNormalizer {
    #[must_use]
    pub fn new(role_claim: impl Into<String>, tenant_claim: impl Into<String>) -> Self {
        Self {
            role_claim: role_claim.into(),
            tenant_claim: tenant_claim.into(),
        }
    }

    /// Build the principal for a raw claim set.
    ///
    /// Structured `role`/`tenant` fields win; only missing ones are read from
    /// the namespaced claims. Feeding the result back through
    /// `RawClaims::from` and normalizing again yields the same fields.
    #[must_use]
    pub fn normalize(&self, raw: RawClaims) -> Principal {
        let role = raw.role.or_else(|| self.read_role(&raw.custom));
        let tenant = raw.tenant.or_else(|| self.read_tenant(&raw.custom));

        Principal::builder(raw.subject)
            .maybe_role(role)
            .maybe_tenant(tenant)
            .maybe_session(raw.session)
            .claims(raw.custom)
            .build()
    }

    fn read_role(&self, claims: &Map<String, Value>) -> Option<Role> {
        let value = claims.get(&self.role_claim)?.as_str()?;
        match value.parse() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::debug!(claim = %self.role_claim, error = %err, "ignoring role claim");
                None
            }
        }
    }

    fn read_tenant(&self, claims: &Map<String, Value>) -> Option<String> {
        claims
            .get(&self.tenant_claim)
            .and_then(Value::as_str)
            .filter(|tenant| !tenant.is_empty())
            .map(str::to_owned)
    }
}
