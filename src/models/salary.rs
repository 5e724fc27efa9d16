use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::money::Money;
use crate::schema::salary;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = salary)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Salary {
    pub month: String,
    pub deduction: bool,
    pub payment_item: String,
    pub amount: BigDecimal,
    pub currency_code: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub exclusive_flag: i32,
}

impl Salary {
    pub fn money(&self) -> Money {
        Money::new(self.amount.clone(), Some(&self.currency_code))
    }
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = salary)]
pub struct NewSalary {
    pub month: String,
    pub deduction: bool,
    pub payment_item: String,
    pub amount: BigDecimal,
    pub currency_code: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub exclusive_flag: i32,
}

impl NewSalary {
    /// One line item for `month` (`YYYYMM`), attributed to `user` for both audit columns.
    pub fn new(
        month: impl Into<String>,
        deduction: bool,
        payment_item: impl Into<String>,
        money: Money,
        user: &str,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            month: month.into(),
            deduction,
            payment_item: payment_item.into(),
            amount: money.amount().clone(),
            currency_code: money.currency_code().to_string(),
            created_by: user.to_string(),
            updated_by: user.to_string(),
            created_at: now,
            updated_at: now,
            exclusive_flag: 0,
        }
    }

    pub fn money(&self) -> Money {
        Money::new(self.amount.clone(), Some(&self.currency_code))
    }
}
