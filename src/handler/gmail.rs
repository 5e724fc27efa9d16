use axum::{extract::State, Json};

use crate::api_models::salary::SalaryResponse;
use crate::api_models::ApiResponse;
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::models::NewSalary;
use crate::services::{gmail, salary as salary_service};

async fn latest(state: &AppState) -> Result<Vec<NewSalary>, AppError> {
    let salaries = gmail::fetch_latest_salaries(
        &state.http_client,
        &state.config.gmail,
        &state.config.application_name,
    )
    .await?;
    if salaries.is_empty() {
        return Err(AppError::NotFound("給与データが見つかりませんでした。".to_string()));
    }
    Ok(salaries)
}

pub async fn latest_salaries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SalaryResponse>>>, AppError> {
    let salaries = latest(&state).await?;
    let response: Vec<SalaryResponse> = salaries.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Salaries retrieved from gmail successfully.", response)))
}

/// メールの給与データを登録する（主キー重複時は更新）
pub async fn import_salaries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<usize>>, AppError> {
    let salaries = latest(&state).await?;
    let count = salary_service::upload(&state.db, &salaries)?;
    Ok(Json(ApiResponse::success(
        format!("{} 件の給与データを登録・更新しました。", count),
        count,
    )))
}
