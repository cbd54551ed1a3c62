pub mod error;
pub mod factory;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use error::{AuthError, AuthErrorKind};
pub use factory::build_token_verifier;
pub use permissions::Permission;
pub use verifier::{Claims, TokenVerifier};
