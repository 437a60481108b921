//! Connection configuration and the credential store seam.
//!
//! The API client never captures the bearer token as a string. It holds a
//! [`TokenProvider`], a deferred accessor called on every request, so a
//! caller can rotate credentials without rebuilding the client.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// Deferred lookup of the current bearer token.
pub type TokenProvider = Arc<dyn Fn() -> String + Send + Sync>;

/// Wrap a fixed token in a [`TokenProvider`].
pub fn static_token(token: impl Into<String>) -> TokenProvider {
    let token = token.into();
    Arc::new(move || token.clone())
}

/// Base URL and bearer token for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub base_url: String,
    pub bearer_token: String,
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Parse `base_url` into an absolute URL that has a host.
    pub fn parse_base_url(&self) -> Result<Url, CoreError> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(CoreError::Configuration("base URL is empty".to_string()));
        }
        let url = Url::parse(raw)
            .map_err(|e| CoreError::Configuration(format!("base URL '{raw}' is invalid: {e}")))?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(CoreError::Configuration(format!(
                "base URL '{raw}' has no host"
            )));
        }
        Ok(url)
    }

    /// Check both fields, naming the first missing piece.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.parse_base_url()?;
        if self.bearer_token.is_empty() {
            return Err(CoreError::Configuration("bearer token is empty".to_string()));
        }
        Ok(())
    }
}

/// Where connection credentials live between sessions.
///
/// How they are persisted is up to the implementor; the client only needs
/// to read them and be told about changes.
pub trait CredentialStore: Send + Sync {
    /// Current base URL and token.
    fn get(&self) -> ConnectionConfig;

    /// Replace the stored base URL and token.
    fn set(&self, base_url: &str, bearer_token: &str);
}

/// Process-local [`CredentialStore`].
///
/// Clones share the same underlying record.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<RwLock<ConnectionConfig>>,
}

impl MemoryCredentialStore {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// A [`TokenProvider`] that reads this store's token at call time, so
    /// a later [`set`](CredentialStore::set) is picked up by the next request.
    pub fn token_provider(&self) -> TokenProvider {
        let inner = Arc::clone(&self.inner);
        Arc::new(move || {
            inner
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .bearer_token
                .clone()
        })
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> ConnectionConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, base_url: &str, bearer_token: &str) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.base_url = base_url.to_string();
        guard.bearer_token = bearer_token.to_string();
    }
}
