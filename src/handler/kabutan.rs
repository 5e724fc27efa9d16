use axum::{
    extract::{Path, State},
    Json,
};

use crate::api_models::kabutan::KabutanStockInfo;
use crate::api_models::ApiResponse;
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::services::kabutan;

pub async fn get_stock_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<KabutanStockInfo>>, AppError> {
    let info = kabutan::fetch_stock_info(&state.http_client, &state.config.kabutan_base_url, code.trim()).await?;
    Ok(Json(ApiResponse::success("Stock info retrieved from kabutan successfully.", info)))
}
