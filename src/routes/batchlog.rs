use axum::{routing::{get, post}, Router};

use crate::app::AppState;
use crate::handler::batchlog::{
    abort_batchlog, add_batchlog_log, begin_batchlog, complete_batchlog, get_batchlog, list_batchlogs,
    search_batchlogs,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_batchlogs))
        .route("/search", get(search_batchlogs))
        .route("/begin", post(begin_batchlog))
        .route("/log", post(add_batchlog_log))
        .route("/:uuid", get(get_batchlog))
        .route("/:uuid/complete", post(complete_batchlog))
        .route("/:uuid/abort", post(abort_batchlog))
}
