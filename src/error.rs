/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - auth error / request body error / repo error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::dto::validate::RequestBodyError;
use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    RequestBody(#[from] RequestBodyError),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("unprocessable")]
    Unprocessable,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(e) if e.kind.is_forbidden() => StatusCode::FORBIDDEN,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::RequestBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::Auth(e) => (e.kind.as_str(), e.detail),
            AppError::RequestBody(e) => (e.code, e.description.to_string()),
            AppError::NotFound { resource } => {
                tracing::debug!(resource, "resource not found");
                ("NotFound", "No resource found".to_string())
            }
            AppError::Unprocessable => ("PersistenceError", "Unprocessable".to_string()),
            AppError::MethodNotAllowed => ("MethodNotAllowed", "Method not allowed".to_string()),
            AppError::PayloadTooLarge => {
                ("PayloadTooLarge", "Request body is too large".to_string())
            }
            AppError::Timeout => ("RequestTimeout", "Request timed out".to_string()),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".to_string()),
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

/// Router fallback for paths that match no route.
pub async fn route_not_found() -> AppError {
    AppError::not_found("route")
}

/// Router fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        // Do not leak driver details to the client.
        tracing::error!(error = ?e, "repository operation failed");
        AppError::Unprocessable
    }
}
