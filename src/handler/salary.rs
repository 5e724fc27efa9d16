use axum::{
    extract::State,
    Json,
};

use crate::api_models::salary::{MonthRangeQuery, SalaryPayload, SalaryResponse};
use crate::api_models::ApiResponse;
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::handler::extract::{AppJson, AppQuery};
use crate::handler::user_or_default;
use crate::models::{NewSalary, Salary};
use crate::services::salary as salary_service;
use crate::utils::clock::now_local;

impl From<Salary> for SalaryResponse {
    fn from(s: Salary) -> Self {
        let money = s.money();
        Self {
            month: s.month,
            deduction: s.deduction,
            payment_item: s.payment_item,
            money,
            created_by: s.created_by,
            updated_by: s.updated_by,
            created_at: s.created_at,
            updated_at: s.updated_at,
            exclusive_flag: s.exclusive_flag,
        }
    }
}

impl From<NewSalary> for SalaryResponse {
    fn from(s: NewSalary) -> Self {
        let money = s.money();
        Self {
            month: s.month,
            deduction: s.deduction,
            payment_item: s.payment_item,
            money,
            created_by: s.created_by,
            updated_by: s.updated_by,
            created_at: s.created_at,
            updated_at: s.updated_at,
            exclusive_flag: s.exclusive_flag,
        }
    }
}

pub async fn list_salaries(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<MonthRangeQuery>,
) -> Result<Json<ApiResponse<Vec<SalaryResponse>>>, AppError> {
    let rows = salary_service::list(&state.db, range.start_ym.as_deref(), range.end_ym.as_deref())?;
    let response: Vec<SalaryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Salaries retrieved successfully.", response)))
}

pub async fn upload_salaries(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Vec<SalaryPayload>>,
) -> Result<Json<ApiResponse<usize>>, AppError> {
    let now = now_local();
    let rows: Vec<NewSalary> = payload
        .into_iter()
        .map(|p| {
            let user = user_or_default(p.user_name, &state);
            NewSalary::new(p.month.trim(), p.deduction, p.payment_item.trim(), p.money, &user, now)
        })
        .collect();
    let count = salary_service::upload(&state.db, &rows)?;
    Ok(Json(ApiResponse::success(
        format!("{} salary rows registered or updated.", count),
        count,
    )))
}
