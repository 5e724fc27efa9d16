use axum::{routing::get, Router};

use crate::app::AppState;
use crate::handler::kabutan::get_stock_info;

pub fn router() -> Router<AppState> {
    Router::new().route("/stock/:code", get(get_stock_info))
}
