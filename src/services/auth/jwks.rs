//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! `JwksCache` is owned by the token verifier and injected through `AppState`,
//! so tests can swap the key source for a static one.
//!
//! Refresh policy:
//! - keys are served from memory until the TTL elapses
//! - an unknown `kid` forces one refetch (key rotation at the identity provider)
//! - concurrent refreshes are allowed; the last writer wins

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use parking_lot::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Upper bound on a JWKS document. Identity providers publish a handful of keys.
const MAX_JWKS_RESPONSE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("failed to fetch JWKS: {0}")]
    Fetch(String),

    #[error("failed to parse JWKS: {0}")]
    Parse(String),

    #[error("JWKS response too large: {0} bytes")]
    ResponseTooLarge(u64),

    #[error("key not found for kid: {0}")]
    KeyNotFound(String),

    #[error("invalid JWKS url: {0}")]
    InvalidUrl(String),
}

/// Where signing keys come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, JwksError>;
}

/// Fetches `https://{domain}/.well-known/jwks.json` with a bounded timeout.
pub struct HttpKeySource {
    client: reqwest::Client,
    jwks_url: Url,
}

impl HttpKeySource {
    pub fn new(jwks_url: &str, timeout: Duration) -> Result<Self, JwksError> {
        let jwks_url = Url::parse(jwks_url).map_err(|e| JwksError::InvalidUrl(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        Ok(Self { client, jwks_url })
    }
}

impl std::fmt::Debug for HttpKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpKeySource")
            .field("jwks_url", &self.jwks_url.as_str())
            .finish()
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::Fetch(format!("HTTP {}", response.status())));
        }

        if let Some(len) = response.content_length()
            && len > MAX_JWKS_RESPONSE_SIZE
        {
            return Err(JwksError::ResponseTooLarge(len));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        if bytes.len() as u64 > MAX_JWKS_RESPONSE_SIZE {
            return Err(JwksError::ResponseTooLarge(bytes.len() as u64));
        }

        let jwks: JwkSet =
            serde_json::from_slice(&bytes).map_err(|e| JwksError::Parse(e.to_string()))?;

        debug!(keys = jwks.keys.len(), "fetched JWKS");
        Ok(jwks)
    }
}

struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
}

impl CachedJwks {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

pub struct JwksCache {
    source: Arc<dyn KeySource>,
    cache: RwLock<Option<CachedJwks>>,
    ttl: Duration,
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("ttl", &self.ttl)
            .field("cached", &self.cache.read().is_some())
            .finish()
    }
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
            ttl,
        }
    }

    /// Resolve a signing key by `kid`.
    ///
    /// Looks in the cached set first. On a miss (or an expired cache) the set is
    /// refetched once; a kid still absent after that is `KeyNotFound`.
    pub async fn resolve(&self, kid: &str) -> Result<Jwk, JwksError> {
        if let Some(jwk) = self.cached_key(kid) {
            return Ok(jwk);
        }

        if self.has_fresh_cache() {
            warn!(kid, "kid not found in cached JWKS, refreshing");
        }

        let jwks = self.refresh().await?;

        jwks.find(kid)
            .cloned()
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    /// Refetch the key set and replace the cached copy.
    pub async fn refresh(&self) -> Result<JwkSet, JwksError> {
        let jwks = self.source.fetch().await?;

        *self.cache.write() = Some(CachedJwks {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });

        Ok(jwks)
    }

    fn cached_key(&self, kid: &str) -> Option<Jwk> {
        let cache = self.cache.read();
        let cached = cache.as_ref().filter(|c| !c.is_expired(self.ttl))?;
        cached.jwks.find(kid).cloned()
    }

    fn has_fresh_cache(&self) -> bool {
        self.cache
            .read()
            .as_ref()
            .is_some_and(|c| !c.is_expired(self.ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StaticKeySource, TEST_KID, test_jwks};

    #[test]
    fn cached_jwks_expiration() {
        let cached = CachedJwks {
            jwks: JwkSet { keys: vec![] },
            fetched_at: Instant::now() - Duration::from_secs(100),
        };
        assert!(cached.is_expired(Duration::from_secs(60)));

        let cached = CachedJwks {
            jwks: JwkSet { keys: vec![] },
            fetched_at: Instant::now(),
        };
        assert!(!cached.is_expired(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn resolve_fetches_once_for_cached_kid() {
        let source = Arc::new(StaticKeySource::new(test_jwks()));
        let cache = JwksCache::new(source.clone(), Duration::from_secs(3600));

        cache.resolve(TEST_KID).await.unwrap();
        cache.resolve(TEST_KID).await.unwrap();

        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn unknown_kid_refreshes_once_then_fails() {
        let source = Arc::new(StaticKeySource::new(test_jwks()));
        let cache = JwksCache::new(source.clone(), Duration::from_secs(3600));

        cache.resolve(TEST_KID).await.unwrap();
        let err = cache.resolve("rotated-away").await.unwrap_err();

        assert!(matches!(err, JwksError::KeyNotFound(kid) if kid == "rotated-away"));
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn rotated_key_is_picked_up_on_miss() {
        let source = Arc::new(StaticKeySource::new(JwkSet { keys: vec![] }));
        let cache = JwksCache::new(source.clone(), Duration::from_secs(3600));

        assert!(cache.resolve(TEST_KID).await.is_err());

        source.replace(test_jwks());
        let jwk = cache.resolve(TEST_KID).await.unwrap();

        assert_eq!(jwk.common.key_id.as_deref(), Some(TEST_KID));
    }

    #[tokio::test]
    async fn expired_cache_is_refetched() {
        let source = Arc::new(StaticKeySource::new(test_jwks()));
        let cache = JwksCache::new(source.clone(), Duration::ZERO);

        cache.resolve(TEST_KID).await.unwrap();
        std::thread::sleep(Duration::from_millis(5));
        cache.resolve(TEST_KID).await.unwrap();

        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn source_failure_is_surfaced() {
        let source = Arc::new(StaticKeySource::failing());
        let cache = JwksCache::new(source, Duration::from_secs(3600));

        let err = cache.resolve(TEST_KID).await.unwrap_err();

        assert!(matches!(err, JwksError::Fetch(_)));
    }

    #[test]
    fn http_source_debug_shows_url() {
        let source = HttpKeySource::new(
            "https://casting.test.auth0.com/.well-known/jwks.json",
            Duration::from_secs(1),
        )
        .unwrap();

        let debug = format!("{source:?}");
        assert!(debug.contains("HttpKeySource"));
        assert!(debug.contains("casting.test.auth0.com/.well-known/jwks.json"));
    }

    #[test]
    fn http_source_rejects_bad_url() {
        let err = HttpKeySource::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, JwksError::InvalidUrl(_)));
    }
}
