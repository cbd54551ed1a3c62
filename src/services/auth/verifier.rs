//! Bearer token verification against the identity provider's JWKS.
//!
//! Order of checks (the first failure wins):
//! 1. `Authorization` header present
//! 2. header shape is `Bearer <token>`
//! 3. token is three non-empty dot-separated parts with a decodable header carrying `kid`
//! 4. `kid` resolves to an RSA key in the JWKS
//! 5. RS256 signature, then `exp` / `aud` / `iss`

use std::sync::Arc;

use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header,
    jwk::{AlgorithmParameters, Jwk},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{error::AuthError, jwks::JwksCache};

/// Verified token payload, exactly as the identity provider issued it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// RS256 access-token verifier.
///
/// Issuer / audience / leeway are fixed at construction; keys come from the
/// injected `JwksCache`.
pub struct TokenVerifier {
    jwks: Arc<JwksCache>,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("jwks", &self.jwks)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(jwks: Arc<JwksCache>, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = leeway_seconds;

        Self { jwks, validation }
    }

    /// Verify the raw `Authorization` header value and return the decoded claims.
    pub async fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let token = extract_bearer(authorization)?;
        check_compact_form(token)?;

        let header = decode_header(token)
            .map_err(|_| AuthError::malformed_token("Unable to parse authentication token."))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::malformed_token("Authorization malformed."))?;

        let jwk = self.jwks.resolve(&kid).await.map_err(|err| {
            warn!(kid = %kid, error = %err, "signing key lookup failed");
            AuthError::unknown_key("Unable to find the appropriate key.")
        })?;
        let key = rsa_decoding_key(&jwk)?;

        let data = decode::<Claims>(token, &key, &self.validation)?;

        debug!(sub = data.claims.subject(), "access token verified");
        Ok(data.claims)
    }
}

/// Split `Bearer <token>` into the token part.
pub fn extract_bearer(authorization: Option<&str>) -> Result<&str, AuthError> {
    let value = authorization.ok_or_else(AuthError::missing_header)?;

    match value.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] => Ok(*token),
        [_, _] => Err(AuthError::malformed_header(
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::malformed_header("Token not found.")),
        _ => Err(AuthError::malformed_header(
            "Authorization header must be bearer token.",
        )),
    }
}

fn check_compact_form(token: &str) -> Result<(), AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(AuthError::malformed_token(
            "Token must have header, payload and signature.",
        ));
    }
    Ok(())
}

fn rsa_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|_| AuthError::unknown_key("Signing key has invalid RSA parameters.")),
        _ => Err(AuthError::unknown_key("Signing key is not an RSA key.")),
    }
}
