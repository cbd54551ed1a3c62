/*
 * Responsibility
 * - mutating endpoint の request body 形状チェック (key の有無のみ)
 * - 型チェックはしない: 型が合わない値は保存時に 422 になる
 * - pure function (永続化には触れない)
 */
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {description}")]
pub struct RequestBodyError {
    pub code: &'static str,
    pub description: &'static str,
}

impl RequestBodyError {
    pub fn empty_or_missing_keys() -> Self {
        Self {
            code: "Request body error",
            description: "Request body was empty or valid keys are missing",
        }
    }
}

const ACTOR_FIELDS: [&str; 3] = ["name", "age", "gender"];
const MOVIE_FIELDS: [&str; 2] = ["title", "release_date"];

/// All of `name`, `age`, `gender` must be present.
pub fn validate_create_actor(body: &Value) -> Result<(), RequestBodyError> {
    require(body, |fields| ACTOR_FIELDS.iter().all(|k| fields.contains_key(*k)))
}

/// At least one of `name`, `age`, `gender`.
pub fn validate_update_actor(body: &Value) -> Result<(), RequestBodyError> {
    require(body, |fields| ACTOR_FIELDS.iter().any(|k| fields.contains_key(*k)))
}

/// At least one of `title`, `release_date`.
pub fn validate_movie(body: &Value) -> Result<(), RequestBodyError> {
    require(body, |fields| MOVIE_FIELDS.iter().any(|k| fields.contains_key(*k)))
}

fn require(
    body: &Value,
    shape: impl Fn(&serde_json::Map<String, Value>) -> bool,
) -> Result<(), RequestBodyError> {
    match body {
        Value::Object(fields) if !fields.is_empty() && shape(fields) => Ok(()),
        _ => Err(RequestBodyError::empty_or_missing_keys()),
    }
}
