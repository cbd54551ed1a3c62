/*
 * Responsibility
 * - /actors 系 CRUD handler
 * - permission チェックは routes 側の access::require で済んでいる (AuthCtxExtractor で受け取る)
 * - mutating handler は body validation → repo 呼び出しの順を守る
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    api::v1::{
        dto::{
            actors::{ActorResponse, CreateActorRequest, UpdateActorRequest},
            validate::{validate_create_actor, validate_update_actor},
        },
        extractors::{AuthCtxExtractor, ResourceId},
    },
    error::AppError,
    state::AppState,
};

const LIST_LIMIT: i64 = 50;

/// Missing or unparseable JSON is treated as an empty body.
pub(crate) fn body_or_empty(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(v)) => v,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "request body rejected");
            Value::Null
        }
    }
}

pub async fn list_actors(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
) -> Result<Json<Value>, AppError> {
    let rows = state.actors.list(LIST_LIMIT).await?;
    let actors: Vec<ActorResponse> = rows.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "success": true, "actors": actors })))
}

pub async fn get_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    ResourceId(actor_id): ResourceId,
) -> Result<Json<Value>, AppError> {
    let row = state
        .actors
        .get(actor_id)
        .await?
        .ok_or(AppError::not_found("actor"))?;

    Ok(Json(
        json!({ "success": true, "actor": ActorResponse::from(row) }),
    ))
}

pub async fn create_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body_or_empty(body);
    validate_create_actor(&body)?;

    let req = CreateActorRequest::from_body(body)?;
    let row = state.actors.insert(req.into_new_actor()).await?;

    tracing::info!(
        actor_id = row.id,
        sub = ctx.subject(),
        permission = %ctx.permission,
        "actor created"
    );

    Ok(Json(
        json!({ "success": true, "actor": ActorResponse::from(row) }),
    ))
}

pub async fn update_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ResourceId(actor_id): ResourceId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body_or_empty(body);
    validate_update_actor(&body)?;

    let mut row = state
        .actors
        .get(actor_id)
        .await?
        .ok_or(AppError::not_found("actor"))?;

    UpdateActorRequest::from_body(body)?.apply(&mut row);
    state.actors.update(&row).await?;

    tracing::info!(
        actor_id,
        sub = ctx.subject(),
        permission = %ctx.permission,
        "actor updated"
    );

    Ok(Json(
        json!({ "success": true, "actor": ActorResponse::from(row) }),
    ))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ResourceId(actor_id): ResourceId,
) -> Result<Json<Value>, AppError> {
    if !state.actors.delete(actor_id).await? {
        return Err(AppError::not_found("actor"));
    }

    tracing::info!(
        actor_id,
        sub = ctx.subject(),
        permission = %ctx.permission,
        "actor deleted"
    );

    Ok(Json(json!({ "success": true, "deleted": actor_id })))
}
