use axum::{middleware::from_fn_with_state, Router};

use crate::app::AppState;
use crate::utils::middleware::{require_api_key, require_loopback};

mod batchlog;
mod gmail;
mod kabutan;
mod root;
mod salary;
mod stock;

pub fn build_routes(state: AppState) -> Router<AppState> {
    // 業務 API は /api 配下、API キーとローカル制限を掛ける
    let api = Router::new()
        .nest("/batchlogs", batchlog::router())
        .nest("/salaries", salary::router())
        .nest("/stocks", stock::router())
        .nest("/gmail", gmail::router())
        .nest("/kabutan", kabutan::router())
        .layer(from_fn_with_state(state.clone(), require_loopback))
        .layer(from_fn_with_state(state, require_api_key));

    Router::new()
        // ルートとヘルスチェック（認証なし）
        .merge(root::router())
        .nest("/api", api)
}
