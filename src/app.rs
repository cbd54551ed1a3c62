/*
 * Responsibility
 * - Config読み込み → 依存生成 (DB pool / JWKS 付き TokenVerifier) → Router 組み立て
 * - Middleware の適用 (CORS / request id / trace / limits)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::{health::health, index::index};
use crate::config::Config;
use crate::error::{method_not_allowed, route_not_found};
use crate::middleware;
use crate::repos::{actor_repo::PgActorRepo, movie_repo::PgMovieRepo};
use crate::services::auth::build_token_verifier;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,casting_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    // Keys are fetched lazily on the first protected request.
    let verifier = build_token_verifier(config)?;
    tracing::info!(jwks_url = %config.jwks_url(), issuer = %config.issuer(), "token verifier ready");

    Ok(AppState::new(
        verifier,
        Arc::new(PgActorRepo::new(db.clone())),
        Arc::new(PgMovieRepo::new(db)),
    ))
}

/// Routes without transport middleware.
fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(&state))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = routes(state);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
