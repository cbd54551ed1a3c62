/// Factory: build `TokenVerifier` (and its JWKS cache) from application `Config`.
use std::{sync::Arc, time::Duration};

use crate::config::Config;
use crate::services::auth::{
    TokenVerifier,
    jwks::{HttpKeySource, JwksCache, JwksError},
};

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, JwksError> {
    let source = HttpKeySource::new(
        &config.jwks_url(),
        Duration::from_secs(config.jwks_fetch_timeout_seconds),
    )?;

    let jwks = JwksCache::new(
        Arc::new(source),
        Duration::from_secs(config.jwks_cache_ttl_seconds),
    );

    let verifier = TokenVerifier::new(
        Arc::new(jwks),
        &config.issuer(),
        &config.api_audience,
        config.access_token_leeway_seconds,
    );

    Ok(Arc::new(verifier))
}
