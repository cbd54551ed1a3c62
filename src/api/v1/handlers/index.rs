/*
 * Responsibility
 * - GET / (public): 最新の actors / movies を 10 件ずつ
 * - guard を掛けない唯一の data endpoint
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    api::v1::dto::{actors::ActorResponse, movies::MovieResponse},
    error::AppError,
    state::AppState,
};

const RECENT_LIMIT: i64 = 10;

pub async fn index(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let actors = state.actors.list(RECENT_LIMIT).await?;
    let movies = state.movies.list(RECENT_LIMIT).await?;

    let actors: Vec<ActorResponse> = actors.into_iter().map(Into::into).collect();
    let movies: Vec<MovieResponse> = movies.into_iter().map(Into::into).collect();

    Ok(Json(json!({
        "success": true,
        "actors": actors,
        "movies": movies,
    })))
}
