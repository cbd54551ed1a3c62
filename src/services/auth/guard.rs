//! Access decision pipeline: verify the bearer token, then check one permission.
//!
//! Verification errors always win over permission errors: a malformed token is
//! reported as malformed, never as "permission denied".

use std::future::Future;

use tracing::warn;

use super::{
    error::AuthError,
    permissions::{Permission, authorize},
    verifier::{Claims, TokenVerifier},
};

/// Run verify + authorize and return the claims on success.
pub async fn check(
    verifier: &TokenVerifier,
    required: Permission,
    authorization: Option<&str>,
) -> Result<Claims, AuthError> {
    let claims = verifier.verify(authorization).await.inspect_err(|err| {
        warn!(kind = %err.kind, permission = %required, "access token rejected");
    })?;

    authorize(&claims, required).inspect_err(|err| {
        warn!(
            kind = %err.kind,
            permission = %required,
            sub = claims.subject(),
            "permission check failed"
        );
    })?;

    Ok(claims)
}

/// Wrap `operation` with the access check for `required`.
///
/// `operation` runs at most once, and only after both checks pass.
pub async fn guard<T, E, F, Fut>(
    verifier: &TokenVerifier,
    required: Permission,
    authorization: Option<&str>,
    operation: F,
) -> Result<T, E>
where
    E: From<AuthError>,
    F: FnOnce(Claims) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let claims = check(verifier, required, authorization).await?;
    operation(claims).await
}
