use crate::models::{NewStock, Stock};
use crate::repositories::stock as stock_repo;
use crate::services::ServiceError;
use crate::utils::db_worker::DbWorker;

pub fn list_all(db: &DbWorker) -> Result<Vec<Stock>, ServiceError> {
    let mut conn = db.conn()?;
    Ok(stock_repo::list_all(&mut conn)?)
}

pub fn get(db: &DbWorker, code: &str) -> Result<Stock, ServiceError> {
    let mut conn = db.conn()?;
    stock_repo::find_by_code(&mut conn, code)?
        .ok_or_else(|| ServiceError::NotFound(format!("Stock '{}' not found.", code)))
}

pub fn validate(row: &NewStock) -> Result<(), ServiceError> {
    if row.code.trim().is_empty() {
        return Err(ServiceError::Validation("code is required.".to_string()));
    }
    if row.name.trim().is_empty() {
        return Err(ServiceError::Validation(format!("name is required for '{}'.", row.code)));
    }
    Ok(())
}

pub fn upload(db: &DbWorker, rows: &[NewStock]) -> Result<usize, ServiceError> {
    rows.iter().try_for_each(validate)?;
    if rows.is_empty() {
        return Ok(0);
    }

    let count = db.transaction(|conn| {
        let mut count = 0;
        for row in rows {
            count += stock_repo::upsert(conn, row)?;
        }
        Ok::<usize, ServiceError>(count)
    })?;
    tracing::info!("upserted {} stock rows", count);
    Ok(count)
}

pub fn delete(db: &DbWorker, code: &str) -> Result<usize, ServiceError> {
    let mut conn = db.conn()?;
    let deleted = stock_repo::delete_by_code(&mut conn, code)?;
    if deleted == 0 {
        return Err(ServiceError::NotFound(format!("Stock '{}' not found.", code)));
    }
    Ok(deleted)
}
