//! Token cache abstraction and OAuth exchange helpers.
//!
//! The client-credentials exchange itself needs the transport and lives in
//! [`crate::client`]; this module holds the pure half: cache keys, the TTL
//! policy, and the [`TokenCache`] seam an external store plugs into.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::error::Result;
use crate::types::Scope;

/// Safety margin subtracted from `expires_in` when caching, so a cached
/// token cannot expire mid-flight.
pub const TOKEN_TTL_MARGIN_SECS: u64 = 10;

/// Key-value store for issued access tokens.
///
/// Entries must be evicted at expiry: reads are trusted without a second
/// expiry check. Any networked cache with TTL support (Redis and the like)
/// satisfies this; get/set are assumed atomic.
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// Cache key for a (client, scope) pair. One token per pair; tokens are
/// not interchangeable across scopes.
pub fn token_cache_key(client_id: &str, scope: Scope) -> String {
    format!("{client_id}:token:{scope}")
}

/// `Authorization` header value for the client-credentials exchange.
pub(crate) fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{client_id}:{client_secret}")))
}

/// Body of a successful `tokens/v2/oauth` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

impl TokenResponse {
    /// TTL to cache under, or `None` when the token cannot outlive the
    /// safety margin and is not worth caching.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.expires_in > TOKEN_TTL_MARGIN_SECS)
            .then(|| Duration::from_secs(self.expires_in - TOKEN_TTL_MARGIN_SECS))
    }
}

/// In-process token cache with per-entry expiry.
///
/// Suitable for a single process reusing tokens across calls; multi-process
/// deployments should implement [`TokenCache`] over a shared store instead.
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }
}
