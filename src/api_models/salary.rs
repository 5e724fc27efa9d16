use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Money;

/// One uploaded ledger line. Audit fields are filled in by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryPayload {
    pub month: String,
    #[serde(default)]
    pub deduction: bool,
    pub payment_item: String,
    pub money: Money,
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResponse {
    pub month: String,
    pub deduction: bool,
    pub payment_item: String,
    pub money: Money,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub exclusive_flag: i32,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthRangeQuery {
    pub start_ym: Option<String>,
    pub end_ym: Option<String>,
}
