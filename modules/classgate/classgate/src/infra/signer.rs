//! HMAC-SHA256 signing for the session protocol. Not used on the request path.

use classgate_sdk::SessionToken;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("session signing secret is not configured")]
    MissingSecret,

    #[error("failed to sign token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

pub struct SessionTokenSigner {
    key: EncodingKey,
}

impl SessionTokenSigner {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        }
    }

    /// Build a signer from an optional configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::MissingSecret`] when no secret is configured.
    pub fn from_config(secret: Option<&SecretString>) -> Result<Self, SignError> {
        secret.map(Self::new).ok_or(SignError::MissingSecret)
    }

    /// Sign an arbitrary claim payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Jwt`] if the payload cannot be serialized.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, SignError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.key,
        )?)
    }

    /// Issue the token a session-tenant member presents as its bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Jwt`] if signing fails.
    pub fn issue_session_token(
        &self,
        session_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<String, SignError> {
        self.sign(&SessionToken {
            id: session_id.into(),
            token: token.into(),
        })
    }
}
