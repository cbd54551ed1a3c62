/*
 * Responsibility
 * - /movies 系 CRUD handler
 * - create / update とも validate_movie (title か release_date のどちらか) を通す
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    api::v1::{
        dto::{
            movies::{CreateMovieRequest, MovieResponse, UpdateMovieRequest},
            validate::validate_movie,
        },
        extractors::{AuthCtxExtractor, ResourceId},
        handlers::actors::body_or_empty,
    },
    error::AppError,
    state::AppState,
};

const LIST_LIMIT: i64 = 50;

pub async fn list_movies(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
) -> Result<Json<Value>, AppError> {
    let rows = state.movies.list(LIST_LIMIT).await?;
    let movies: Vec<MovieResponse> = rows.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "success": true, "movies": movies })))
}

pub async fn get_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    ResourceId(movie_id): ResourceId,
) -> Result<Json<Value>, AppError> {
    let row = state
        .movies
        .get(movie_id)
        .await?
        .ok_or(AppError::not_found("movie"))?;

    Ok(Json(
        json!({ "success": true, "movie": MovieResponse::from(row) }),
    ))
}

pub async fn create_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body_or_empty(body);
    validate_movie(&body)?;

    let req = CreateMovieRequest::from_body(body)?;
    let row = state.movies.insert(req.into_new_movie()).await?;

    tracing::info!(
        movie_id = row.id,
        sub = ctx.subject(),
        permission = %ctx.permission,
        "movie created"
    );

    Ok(Json(
        json!({ "success": true, "movie": MovieResponse::from(row) }),
    ))
}

pub async fn update_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ResourceId(movie_id): ResourceId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body_or_empty(body);
    validate_movie(&body)?;

    let mut row = state
        .movies
        .get(movie_id)
        .await?
        .ok_or(AppError::not_found("movie"))?;

    UpdateMovieRequest::from_body(body)?.apply(&mut row);
    state.movies.update(&row).await?;

    tracing::info!(
        movie_id,
        sub = ctx.subject(),
        permission = %ctx.permission,
        "movie updated"
    );

    Ok(Json(
        json!({ "success": true, "movie": MovieResponse::from(row) }),
    ))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ResourceId(movie_id): ResourceId,
) -> Result<Json<Value>, AppError> {
    if !state.movies.delete(movie_id).await? {
        return Err(AppError::not_found("movie"));
    }

    tracing::info!(
        movie_id,
        sub = ctx.subject(),
        permission = %ctx.permission,
        "movie deleted"
    );

    Ok(Json(json!({ "success": true, "deleted": movie_id })))
}
