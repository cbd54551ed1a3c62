/*
 * Responsibility
 * - Authorization failure taxonomy shared by verifier / enforcer / guard
 * - Stable machine-readable kind (used as the response `code`) + human-readable detail
 */
use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingHeader,
    MalformedHeader,
    MalformedToken,
    UnknownKey,
    ExpiredToken,
    InvalidClaims,
    InvalidSignature,
    PermissionsClaimMissing,
    PermissionDenied,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingHeader => "MissingHeader",
            Self::MalformedHeader => "MalformedHeader",
            Self::MalformedToken => "MalformedToken",
            Self::UnknownKey => "UnknownKey",
            Self::ExpiredToken => "ExpiredToken",
            Self::InvalidClaims => "InvalidClaims",
            Self::InvalidSignature => "InvalidSignature",
            Self::PermissionsClaimMissing => "PermissionsClaimMissing",
            Self::PermissionDenied => "PermissionDenied",
        }
    }

    /// Everything except a missing permission is an authentication problem (401).
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub detail: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn missing_header() -> Self {
        Self::new(
            AuthErrorKind::MissingHeader,
            "Authorization header is expected.",
        )
    }

    pub fn malformed_header(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MalformedHeader, detail)
    }

    pub fn malformed_token(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MalformedToken, detail)
    }

    pub fn unknown_key(detail: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::UnknownKey, detail)
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => Self::new(AuthErrorKind::ExpiredToken, "Token expired."),
            ErrorKind::InvalidAudience => Self::new(
                AuthErrorKind::InvalidClaims,
                "Incorrect claims. Please, check the audience.",
            ),
            ErrorKind::InvalidIssuer => Self::new(
                AuthErrorKind::InvalidClaims,
                "Incorrect claims. Please, check the issuer.",
            ),
            ErrorKind::ImmatureSignature => {
                Self::new(AuthErrorKind::InvalidClaims, "Token is not valid yet.")
            }
            ErrorKind::MissingRequiredClaim(claim) => Self::new(
                AuthErrorKind::InvalidClaims,
                format!("Missing required claim: {claim}."),
            ),
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::new(
                AuthErrorKind::InvalidSignature,
                "Token signature could not be verified.",
            ),
            _ => Self::malformed_token("Unable to parse authentication token."),
        }
    }
}
