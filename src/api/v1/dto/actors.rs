/*
 * Responsibility
 * - Actors の request/response DTO
 * - request は validate 済みの JSON から組み立てる (型が合わなければ 422)
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::non_null;
use crate::{
    error::AppError,
    repos::actor_repo::{ActorRow, NewActor},
};

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl CreateActorRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, "actor body could not be stored");
            AppError::Unprocessable
        })
    }

    pub fn into_new_actor(self) -> NewActor {
        NewActor {
            name: self.name,
            age: self.age,
            gender: self.gender,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateActorRequest {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "non_null")]
    pub gender: Option<String>,
}

impl UpdateActorRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, "actor body could not be stored");
            AppError::Unprocessable
        })
    }

    /// Overwrite only the fields present in the request.
    pub fn apply(self, row: &mut ActorRow) {
        if let Some(name) = self.name {
            row.name = name;
        }
        if let Some(age) = self.age {
            row.age = age;
        }
        if let Some(gender) = self.gender {
            row.gender = gender;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub movies: Vec<String>,
}

impl From<ActorRow> for ActorResponse {
    fn from(row: ActorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            gender: row.gender,
            age: row.age,
            movies: row.movies,
        }
    }
}
