/*
 * Responsibility
 * - Path の `{actor_id}` / `{movie_id}` を数値 ID として受け取る
 * - 数値にならない ID は該当リソースなし (404) として AppError で返す
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i32);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "path id rejected");
                AppError::not_found("resource")
            })?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    async fn echo(ResourceId(id): ResourceId) -> String {
        id.to_string()
    }

    fn router() -> Router {
        Router::new().route("/items/{item_id}", get(echo))
    }

    async fn status_of(uri: &str) -> StatusCode {
        router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn numeric_id_is_extracted() {
        assert_eq!(status_of("/items/7").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        assert_eq!(status_of("/items/abc").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/items/99999999999").await, StatusCode::NOT_FOUND);
    }
}
