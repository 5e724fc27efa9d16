use axum::{routing::{get, post}, Router};

use crate::app::AppState;
use crate::handler::salary::{list_salaries, upload_salaries};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_salaries))
        .route("/upload", post(upload_salaries))
}
