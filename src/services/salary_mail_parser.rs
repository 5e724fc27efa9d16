use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{Money, NewSalary};
use crate::utils::clock::now_local;

#[derive(Debug, Error, PartialEq)]
pub enum SalaryMailError {
    #[error("payment date marker [ 振込日 ] not found in mail body")]
    MissingPaymentDate,
    #[error("invalid payment date: {0}")]
    InvalidPaymentDate(String),
    #[error("invalid amount for '{item}': {amount}")]
    InvalidAmount { item: String, amount: String },
}

static PAYMENT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[ 振込日 \]\s*([0-9]{4}/[0-9]{2}/[0-9]{2})").unwrap());
// 次の "[" までが 1 セクション
static PAYMENT_SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[ 支　給：円 \]([^\[]*)").unwrap());
static DEDUCTION_SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[ 控　除：円 \]([^\[]*)").unwrap());
static LINE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<item>[^\r\n:：]+?)\s*[:：]\s*(?P<amount>[0-9][0-9,]*)").unwrap());

/// Turns a payroll notification mail into salary rows.
///
/// The month comes from `[ 振込日 ] YYYY/MM/DD`. Earnings (`[ 支　給：円 ]`)
/// are returned before deductions (`[ 控　除：円 ]`), each in mail order.
/// A missing section yields no rows for it.
pub fn parse_salary_mail(body: &str, created_by: &str) -> Result<Vec<NewSalary>, SalaryMailError> {
    let raw_date = PAYMENT_DATE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(SalaryMailError::MissingPaymentDate)?;
    let month = NaiveDate::parse_from_str(raw_date, "%Y/%m/%d")
        .map_err(|_| SalaryMailError::InvalidPaymentDate(raw_date.to_string()))?
        .format("%Y%m")
        .to_string();

    let now = now_local();
    let mut rows = Vec::new();
    for (section, deduction) in [(&*PAYMENT_SECTION, false), (&*DEDUCTION_SECTION, true)] {
        let text = match section.captures(body).and_then(|c| c.get(1)) {
            Some(m) => m.as_str(),
            None => continue,
        };
        for (item, amount) in line_items(text)? {
            rows.push(NewSalary::new(
                month.clone(),
                deduction,
                item,
                Money::jpy(amount),
                created_by,
                now,
            ));
        }
    }
    tracing::debug!("parsed {} salary items for {}", rows.len(), month);
    Ok(rows)
}

fn line_items(section: &str) -> Result<Vec<(String, BigDecimal)>, SalaryMailError> {
    LINE_ITEM
        .captures_iter(section)
        .map(|cap| {
            let item = cap["item"].trim().to_string();
            let raw = &cap["amount"];
            let amount = BigDecimal::from_str(&raw.replace(',', "")).map_err(|_| {
                SalaryMailError::InvalidAmount {
                    item: item.clone(),
                    amount: raw.to_string(),
                }
            })?;
            Ok((item, amount))
        })
        .collect()
}
