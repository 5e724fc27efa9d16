use axum::{
    extract::{Path, State},
    Json,
};

use crate::api_models::batchlog::{
    AddLogRequest, BatchlogDetailResponse, BatchlogResponse, BeginBatchRequest, SearchQuery, UserQuery,
};
use crate::api_models::ApiResponse;
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::handler::extract::{AppJson, AppQuery};
use crate::handler::user_or_default;
use crate::models::{Batchlog, BatchlogDetail};
use crate::services::batchlog as batchlog_service;

impl From<BatchlogDetail> for BatchlogDetailResponse {
    fn from(d: BatchlogDetail) -> Self {
        Self {
            log_no: d.log_no,
            log_msg: d.log_msg,
            log_time: d.log_time,
            created_by: d.created_by,
            updated_by: d.updated_by,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<Batchlog> for BatchlogResponse {
    fn from(b: Batchlog) -> Self {
        let m = b.main;
        Self {
            uuid: m.uuid,
            status: m.status,
            program_id: m.program_id,
            program_name: m.program_name,
            start_time: m.start_time,
            end_time: m.end_time,
            created_by: m.created_by,
            updated_by: m.updated_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
            details: b.details.into_iter().map(Into::into).collect(),
        }
    }
}

type BatchlogJson = Json<ApiResponse<BatchlogResponse>>;

pub async fn list_batchlogs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BatchlogResponse>>>, AppError> {
    let items = batchlog_service::list_all(&state.db)?;
    let response: Vec<BatchlogResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Batchlogs retrieved successfully.", response)))
}

pub async fn search_batchlogs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<BatchlogResponse>>>, AppError> {
    let items = batchlog_service::search(&state.db, query.keyword.as_deref(), query.status.as_deref())?;
    let response: Vec<BatchlogResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success("Batchlogs retrieved successfully.", response)))
}

pub async fn get_batchlog(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<BatchlogJson, AppError> {
    let id = batchlog_service::parse_uuid(&uuid)?;
    let found = batchlog_service::get(&state.db, id)?;
    Ok(Json(ApiResponse::success("Batchlog retrieved successfully.", found.into())))
}

pub async fn begin_batchlog(
    State(state): State<AppState>,
    AppJson(payload): AppJson<BeginBatchRequest>,
) -> Result<BatchlogJson, AppError> {
    let user = user_or_default(payload.user_name, &state);
    let started = batchlog_service::begin(
        &state.db,
        &payload.program_id,
        payload.program_name.as_deref(),
        &user,
    )?;
    Ok(Json(ApiResponse::success("Batch started successfully.", started.into())))
}

pub async fn complete_batchlog(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    AppQuery(query): AppQuery<UserQuery>,
) -> Result<BatchlogJson, AppError> {
    let id = batchlog_service::parse_uuid(&uuid)?;
    let user = user_or_default(query.user_name, &state);
    let done = batchlog_service::complete(&state.db, id, &user)?;
    Ok(Json(ApiResponse::success("Batch completed successfully.", done.into())))
}

pub async fn abort_batchlog(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    AppQuery(query): AppQuery<UserQuery>,
) -> Result<BatchlogJson, AppError> {
    let id = batchlog_service::parse_uuid(&uuid)?;
    let user = user_or_default(query.user_name, &state);
    let aborted = batchlog_service::abort(&state.db, id, &user)?;
    Ok(Json(ApiResponse::success("Batch aborted successfully.", aborted.into())))
}

pub async fn add_batchlog_log(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddLogRequest>,
) -> Result<BatchlogJson, AppError> {
    let raw = payload
        .uuid
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("uuid is required.".to_string()))?;
    let id = batchlog_service::parse_uuid(raw)?;
    let user = user_or_default(payload.user_name, &state);
    let updated = batchlog_service::add_log(&state.db, id, payload.log_msg, &user)?;
    Ok(Json(ApiResponse::success("Batchlog detail added successfully.", updated.into())))
}
