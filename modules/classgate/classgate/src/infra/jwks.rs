//! Identity-provider key sets with a rate-limited refresh.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("failed to read key set from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key set: {0}")]
    Parse(#[from] serde_json::Error),

    /// The last refresh failed and the next one is not due yet.
    #[error("key set unavailable, last refresh failed: {0}")]
    Unavailable(String),
}

/// Source of the current key set.
#[async_trait]
pub trait JwksProvider: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, JwksError>;
}

/// Fixed key set, for tests and for deployments that pin their keys.
pub struct StaticJwks {
    keys: JwkSet,
}

impl StaticJwks {
    #[must_use]
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    /// # Errors
    ///
    /// Returns [`JwksError::Parse`] if `json` is not a JWK set.
    pub fn from_json(json: &str) -> Result<Self, JwksError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl JwksProvider for StaticJwks {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        Ok(self.keys.clone())
    }
}

/// Key set file, read again on every refresh so rotated keys are picked up.
pub struct FileJwks {
    path: PathBuf,
}

impl FileJwks {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl JwksProvider for FileJwks {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| JwksError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Caches the last fetched key set. An unknown `kid` triggers a refresh, at
/// most once per `min_refresh`.
pub struct CachedJwks {
    provider: Arc<dyn JwksProvider>,
    keys: ArcSwap<JwkSet>,
    min_refresh: Duration,
    refresh: Mutex<RefreshState>,
}

#[derive(Default)]
struct RefreshState {
    at: Option<Instant>,
    last_error: Option<String>,
}

impl CachedJwks {
    #[must_use]
    pub fn new(provider: Arc<dyn JwksProvider>, min_refresh: Duration) -> Self {
        Self {
            provider,
            keys: ArcSwap::from_pointee(JwkSet { keys: Vec::new() }),
            min_refresh,
            refresh: Mutex::new(RefreshState::default()),
        }
    }

    /// Look up the key with id `kid`.
    ///
    /// # Errors
    ///
    /// Returns [`JwksError`] when a due refresh fails, and
    /// [`JwksError::Unavailable`] until the next refresh after a failed one.
    pub async fn find(&self, kid: &str) -> Result<Option<Jwk>, JwksError> {
        if let Some(jwk) = self.keys.load().find(kid) {
            return Ok(Some(jwk.clone()));
        }

        let mut state = self.refresh.lock().await;

        // Another request may have refreshed while this one waited.
        if let Some(jwk) = self.keys.load().find(kid) {
            return Ok(Some(jwk.clone()));
        }

        if state.at.is_some_and(|at| at.elapsed() < self.min_refresh) {
            if let Some(err) = &state.last_error {
                return Err(JwksError::Unavailable(err.clone()));
            }
            tracing::debug!(kid, "unknown key id, refresh rate limited");
            return Ok(None);
        }

        state.at = Some(Instant::now());
        let fresh = match self.provider.fetch().await {
            Ok(fresh) => fresh,
            Err(err) => {
                tracing::warn!(error = %err, "key set refresh failed");
                state.last_error = Some(err.to_string());
                return Err(err);
            }
        };
        state.last_error = None;
        tracing::debug!(keys = fresh.keys.len(), "key set refreshed");
        let found = fresh.find(kid).cloned();
        self.keys.store(Arc::new(fresh));
        Ok(found)
    }
}
