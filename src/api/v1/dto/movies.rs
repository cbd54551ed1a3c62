/*
 * Responsibility
 * - Movies の request/response DTO
 * - release_date は "YYYY-MM-DD" / "YYYY-MM-DDTHH:MM:SS" / RFC 3339 を受け付ける
 */
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use super::non_null;
use crate::{
    error::AppError,
    repos::movie_repo::{MovieRow, NewMovie},
};

pub fn parse_release_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn de_release_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_release_date(&raw).ok_or_else(|| D::Error::custom("invalid release_date"))
}

fn de_opt_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    de_release_date(deserializer).map(Some)
}

fn unprocessable(e: serde_json::Error) -> AppError {
    tracing::warn!(error = %e, "movie body could not be stored");
    AppError::Unprocessable
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    #[serde(deserialize_with = "de_release_date")]
    pub release_date: NaiveDateTime,
}

impl CreateMovieRequest {
    /// Both fields are required to store a movie, even though validation
    /// only asks for one of them.
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body).map_err(unprocessable)
    }

    pub fn into_new_movie(self) -> NewMovie {
        NewMovie {
            title: self.title,
            release_date: self.release_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    #[serde(default, deserialize_with = "non_null")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de_opt_release_date")]
    pub release_date: Option<NaiveDateTime>,
}

impl UpdateMovieRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        serde_json::from_value(body).map_err(unprocessable)
    }

    pub fn apply(self, row: &mut MovieRow) {
        if let Some(title) = self.title {
            row.title = title;
        }
        if let Some(release_date) = self.release_date {
            row.release_date = release_date;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub release_date: NaiveDateTime,
    pub actors: Vec<String>,
}

impl From<MovieRow> for MovieResponse {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            release_date: row.release_date,
            actors: row.actors,
        }
    }
}
