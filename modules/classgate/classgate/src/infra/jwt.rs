//! RS256 verification of identity-provider tokens.

use std::sync::Arc;

use async_trait::async_trait;
use classgate_sdk::{ExternalVerifier, VerifierError};
use classgate_security::RawClaims;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use super::jwks::CachedJwks;
use crate::config::IdentityProviderConfig;

/// Verifies bearer tokens issued by the configured identity provider.
///
/// Only RS256 is accepted. Issuer and audience are pinned, and `exp`, `iss`,
/// `aud` and `sub` must be present.
pub struct JwtVerifier {
    keys: Arc<CachedJwks>,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn new(config: &IdentityProviderConfig, keys: Arc<CachedJwks>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = config.leeway_secs;
        Self { keys, validation }
    }
}

#[async_trait]
impl ExternalVerifier for JwtVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<RawClaims, VerifierError> {
        let header = jsonwebtoken::decode_header(bearer_token)
            .map_err(|e| VerifierError::Rejected(format!("malformed token header: {e}")))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifierError::Rejected(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerifierError::Rejected("token header has no kid".to_owned()))?;

        let jwk = self
            .keys
            .find(&kid)
            .await
            .map_err(|e| VerifierError::Unavailable(e.to_string()))?
            .ok_or_else(|| VerifierError::Rejected(format!("unknown signing key '{kid}'")))?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| VerifierError::Internal(format!("unusable signing key '{kid}': {e}")))?;

        let data = jsonwebtoken::decode::<Map<String, Value>>(bearer_token, &key, &self.validation)
            .map_err(|e| VerifierError::Rejected(e.to_string()))?;

        RawClaims::from_claim_map(data.claims).map_err(|e| VerifierError::Rejected(e.to_string()))
    }
}
