use chrono::NaiveDate;

use crate::models::{NewSalary, Salary};
use crate::repositories::salary as salary_repo;
use crate::services::ServiceError;
use crate::utils::db_worker::DbWorker;

/// `YYYYMM` with a real calendar month.
pub fn validate_year_month(value: &str) -> Result<(), ServiceError> {
    let valid = value.len() == 6
        && value.bytes().all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(&format!("{}01", value), "%Y%m%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "Invalid year-month '{}', expected YYYYMM.",
            value
        )))
    }
}

fn normalize(value: Option<&str>) -> Result<Option<&str>, ServiceError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            validate_year_month(v)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

/// Every row when both bounds are absent, otherwise the inclusive range.
pub fn list(db: &DbWorker, start_ym: Option<&str>, end_ym: Option<&str>) -> Result<Vec<Salary>, ServiceError> {
    let start = normalize(start_ym)?;
    let end = normalize(end_ym)?;

    let mut conn = db.conn()?;
    let rows = match (start, end) {
        (None, None) => salary_repo::list_all(&mut conn)?,
        (start, end) => salary_repo::list_by_month_range(&mut conn, start, end)?,
    };
    Ok(rows)
}

/// Upserts every row in one transaction and returns how many were written.
pub fn upload(db: &DbWorker, rows: &[NewSalary]) -> Result<usize, ServiceError> {
    for row in rows {
        validate_year_month(&row.month)?;
        if row.payment_item.trim().is_empty() {
            return Err(ServiceError::Validation("paymentItem is required.".to_string()));
        }
    }
    if rows.is_empty() {
        return Ok(0);
    }

    let count = db.transaction(|conn| {
        let mut count = 0;
        for row in rows {
            count += salary_repo::upsert(conn, row)?;
        }
        Ok::<usize, ServiceError>(count)
    })?;
    tracing::info!("upserted {} salary rows", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_validation() {
        assert!(validate_year_month("202501").is_ok());
        assert!(validate_year_month("199912").is_ok());
        assert!(validate_year_month("202513").is_err());
        assert!(validate_year_month("202500").is_err());
        assert!(validate_year_month("2025-1").is_err());
        assert!(validate_year_month("20251").is_err());
        assert!(validate_year_month("２０２５０１").is_err());
    }

    #[test]
    fn blank_bounds_are_ignored() {
        assert_eq!(normalize(Some("  ")).unwrap(), None);
        assert_eq!(normalize(None).unwrap(), None);
        assert_eq!(normalize(Some(" 202404 ")).unwrap(), Some("202404"));
        assert!(normalize(Some("abc")).is_err());
    }
}
