/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - access middleware が token 検証 + permission チェック後に request extensions に格納する
 */
use crate::services::auth::{Claims, Permission};

/// 認可済みのリクエストに付与されるコンテキスト
///
/// - `claims` は identity provider が発行した payload そのまま
/// - `permission` はこの route が要求し、満たされた permission
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub claims: Claims,
    pub permission: Permission,
}

impl AuthCtx {
    pub fn new(claims: Claims, permission: Permission) -> Self {
        Self { claims, permission }
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.subject()
    }
}
