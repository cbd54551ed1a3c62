/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: JWKS cache を抱えた TokenVerifier
 *   - actors / movies: 永続化 (trait object なので test では in-memory に差し替え)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::{actor_repo::ActorRepo, movie_repo::MovieRepo};
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub actors: Arc<dyn ActorRepo>,
    pub movies: Arc<dyn MovieRepo>,
}

impl AppState {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        actors: Arc<dyn ActorRepo>,
        movies: Arc<dyn MovieRepo>,
    ) -> Self {
        Self {
            verifier,
            actors,
            movies,
        }
    }
}
