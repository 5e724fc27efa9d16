use std::sync::Arc;

use axum::Router;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use crate::routes;
use crate::utils::config::AppConfig;
use crate::utils::db_worker::{create_pool, DbWorker};
use crate::utils::http_client::create_client;
use crate::utils::middleware;

#[derive(Clone)]
pub struct AppState {
    pub db: DbWorker,
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(db: DbWorker, config: AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            config: Arc::new(config),
            http_client: create_client()?,
        })
    }
}

/// Connects the pool and assembles the router.
pub fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let pool = create_pool(&config.database.url, config.database.pool_size)?;
    let state = AppState::new(DbWorker::new(pool), config)?;
    Ok(build_app_with_state(state))
}

pub fn build_app_with_state(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.config.server.allowed_origins);

    routes::build_routes(state.clone())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
