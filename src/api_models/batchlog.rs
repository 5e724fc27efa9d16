use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::BatchlogStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginBatchRequest {
    #[serde(default)]
    pub program_id: String,
    pub program_name: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLogRequest {
    pub uuid: Option<String>,
    pub log_msg: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchlogDetailResponse {
    pub log_no: i32,
    pub log_msg: Option<String>,
    pub log_time: NaiveDateTime,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchlogResponse {
    pub uuid: Uuid,
    pub status: BatchlogStatus,
    pub program_id: String,
    pub program_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub details: Vec<BatchlogDetailResponse>,
}
