/*
 * Responsibility
 * - Permission vocabulary (identity provider の role 設定と一致させる)
 * - claims.permissions に対する membership 判定 (pure)
 */
use std::fmt;

use serde_json::Value;

use super::{
    error::{AuthError, AuthErrorKind},
    verifier::Claims,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadActor,
    CreateActor,
    UpdateActor,
    DeleteActor,
    ReadMovie,
    CreateMovie,
    UpdateMovie,
    DeleteMovie,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadActor => "read:actor",
            Self::CreateActor => "create:actor",
            Self::UpdateActor => "update:actor",
            Self::DeleteActor => "delete:actor",
            Self::ReadMovie => "read:movie",
            Self::CreateMovie => "create:movie",
            Self::UpdateMovie => "update:movie",
            Self::DeleteMovie => "delete:movie",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `claims` grant `required`.
///
/// Exact, case-sensitive membership in the `permissions` array. Non-string
/// entries are ignored.
pub fn authorize(claims: &Claims, required: Permission) -> Result<(), AuthError> {
    let granted = match claims.get("permissions") {
        Some(Value::Array(granted)) => granted,
        _ => {
            return Err(AuthError::new(
                AuthErrorKind::PermissionsClaimMissing,
                "Permissions not included in JWT.",
            ));
        }
    };

    let allowed = granted
        .iter()
        .filter_map(Value::as_str)
        .any(|p| p == required.as_str());

    if allowed {
        Ok(())
    } else {
        Err(AuthError::new(
            AuthErrorKind::PermissionDenied,
            "Permission not found.",
        ))
    }
}
