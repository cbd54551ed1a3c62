//! Route guard: bearer token 検証 + permission チェック → AuthCtx を extensions に入れる
//!
//! - 各 route は `require` で permission を一つだけ宣言する
//! - 失敗時は最初に失敗したチェックのエラーをそのまま返す (401 / 403)
//! - `require` を通していない route は public

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthError, Permission, TokenVerifier, guard::guard};
use crate::state::AppState;

#[derive(Clone)]
struct RequiredPermission {
    verifier: Arc<TokenVerifier>,
    permission: Permission,
}

/// `route` を `permission` で保護する。
///
/// 例：
/// ```ignore
/// .route("/actors", access::require(&state, Permission::ReadActor, get(list_actors)))
/// ```
pub fn require(
    state: &AppState,
    permission: Permission,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let required = RequiredPermission {
        verifier: state.verifier.clone(),
        permission,
    };

    // route_layer: この MethodRouter に登録済みの method だけに掛かる
    route.route_layer(middleware::from_fn_with_state(required, access_middleware))
}

async fn access_middleware(
    State(required): State<RequiredPermission>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map(str::to_owned)
                .map_err(|_| AuthError::malformed_header("Authorization header is not valid text."))
        })
        .transpose()?;

    let permission = required.permission;

    guard(
        &required.verifier,
        permission,
        authorization.as_deref(),
        |claims| async move {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(AuthCtx::new(claims, permission));
            Ok(next.run(req).await)
        },
    )
    .await
}
