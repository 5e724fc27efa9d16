use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::schema::stock;

/// 保有株式
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = stock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Stock {
    pub code: String,
    pub name: String,
    pub quantity: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: Option<NaiveDate>,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = stock)]
pub struct NewStock {
    pub code: String,
    pub name: String,
    pub quantity: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: Option<NaiveDate>,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
