use axum::{
    extract::{Path, State},
    Json,
};

use crate::api_models::stock::{StockPayload, StockResponse};
use crate::api_models::ApiResponse;
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::handler::extract::AppJson;
use crate::models::{NewStock, Stock};
use crate::services::stock as stock_service;
use crate::utils::clock::now_local;

impl From<Stock> for StockResponse {
    fn from(s: Stock) -> Self {
        Self {
            code: s.code,
            name: s.name,
            quantity: s.quantity,
            purchase_price: s.purchase_price,
            purchase_date: s.purchase_date,
            memo: s.memo,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

pub async fn list_stocks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StockResponse>>>, AppError> {
    let items = stock_service::list_all(&state.db)?;
    let response: Vec<StockResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Stocks retrieved successfully.", response)))
}

pub async fn get_stock(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<StockResponse>>, AppError> {
    let found = stock_service::get(&state.db, code.trim())?;
    Ok(Json(ApiResponse::success("Stock retrieved successfully.", found.into())))
}

pub async fn upload_stocks(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Vec<StockPayload>>,
) -> Result<Json<ApiResponse<usize>>, AppError> {
    let now = now_local();
    let rows: Vec<NewStock> = payload
        .into_iter()
        .map(|p| NewStock {
            code: p.code.trim().to_string(),
            name: p.name.trim().to_string(),
            quantity: p.quantity,
            purchase_price: p.purchase_price,
            purchase_date: p.purchase_date,
            memo: p.memo,
            created_at: now,
            updated_at: now,
        })
        .collect();
    let count = stock_service::upload(&state.db, &rows)?;
    Ok(Json(ApiResponse::success(
        format!("{} stock rows registered or updated.", count),
        count,
    )))
}

pub async fn delete_stock(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<usize>>, AppError> {
    let deleted = stock_service::delete(&state.db, code.trim())?;
    Ok(Json(ApiResponse::success("Stock deleted successfully.", deleted)))
}
