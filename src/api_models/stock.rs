use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPayload {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub quantity: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: Option<NaiveDate>,
    pub memo: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub code: String,
    pub name: String,
    pub quantity: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: Option<NaiveDate>,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
