//! Session-path verification for members of the reserved session tenant.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use classgate_sdk::{SessionStore, SessionToken, StoreError};
use classgate_security::{Principal, Role, SessionInfo};
use thiserror::Error;

/// A session token whose payload could not be read.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("session token must have 3 parts separated by dots")]
    Shape,

    #[error("failed to decode session token payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to parse session token payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read the `{id, token}` payload of a session token.
///
/// The envelope signature is not checked here; trust comes from the session
/// store confirming the decoded token.
///
/// # Errors
///
/// Returns [`DecodeError`] when the token is not a three-part envelope or the
/// payload is not base64url-encoded JSON of the expected shape.
pub fn decode_session_token(token: &str) -> Result<SessionToken, DecodeError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DecodeError::Shape);
    };

    let payload_bytes = URL_SAFE_NO_PAD.decode(payload)?;
    Ok(serde_json::from_slice(&payload_bytes)?)
}

/// Verifies session tokens against the session-record store.
pub struct SessionTokenVerifier {
    store: Arc<dyn SessionStore>,
    session_tenant: String,
}

impl SessionTokenVerifier {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, session_tenant: impl Into<String>) -> Self {
        Self {
            store,
            session_tenant: session_tenant.into(),
        }
    }

    /// Verify `token` for the member addressed by the request path.
    ///
    /// Returns `Ok(None)` when the token cannot be decoded or does not match a
    /// live session; both are authentication failures, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the session store fails.
    pub async fn verify(
        &self,
        token: &str,
        member_id: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let session = match decode_session_token(token) {
            Ok(session) => session,
            Err(err) => {
                tracing::debug!(error = %err, "undecodable session token");
                return Ok(None);
            }
        };

        if !self
            .store
            .check_session_token(member_id, &session.token)
            .await?
        {
            tracing::debug!(
                session_id = %session.id,
                "session token does not match a live session"
            );
            return Ok(None);
        }

        let principal = Principal::builder(member_id)
            .role(Role::Student)
            .tenant(self.session_tenant.clone())
            .session(SessionInfo::new(session.id, session.token))
            .build();

        Ok(Some(principal))
    }
}
