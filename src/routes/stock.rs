use axum::{routing::{get, post}, Router};

use crate::app::AppState;
use crate::handler::stock::{delete_stock, get_stock, list_stocks, upload_stocks};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stocks))
        .route("/upload", post(upload_stocks))
        .route("/:code", get(get_stock).delete(delete_stock))
}
