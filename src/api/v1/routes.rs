/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 各 method に access::require で permission を一つずつ宣言する
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::{
    api::v1::handlers::{
        actors::{create_actor, delete_actor, get_actor, list_actors, update_actor},
        movies::{create_movie, delete_movie, get_movie, list_movies, update_movie},
    },
    error::method_not_allowed,
    middleware::auth::access::require,
    services::auth::Permission,
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/actors",
            require(state, Permission::ReadActor, get(list_actors))
                .merge(require(state, Permission::CreateActor, post(create_actor))),
        )
        .route(
            "/actors/{actor_id}",
            require(state, Permission::ReadActor, get(get_actor))
                .merge(require(state, Permission::UpdateActor, patch(update_actor)))
                .merge(require(state, Permission::DeleteActor, delete(delete_actor))),
        )
        .route(
            "/movies",
            require(state, Permission::ReadMovie, get(list_movies))
                .merge(require(state, Permission::CreateMovie, post(create_movie))),
        )
        .route(
            "/movies/{movie_id}",
            require(state, Permission::ReadMovie, get(get_movie))
                .merge(require(state, Permission::UpdateMovie, patch(update_movie)))
                .merge(require(state, Permission::DeleteMovie, delete(delete_movie))),
        )
        .method_not_allowed_fallback(method_not_allowed)
}
