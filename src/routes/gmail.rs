use axum::{routing::{get, post}, Router};

use crate::app::AppState;
use crate::handler::gmail::{import_salaries, latest_salaries};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/salaries/latest", get(latest_salaries))
        .route("/salaries/import", post(import_salaries))
}
