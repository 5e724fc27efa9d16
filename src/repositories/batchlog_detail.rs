use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::{BatchlogDetail, BatchlogMain, NewBatchlogDetail};
use crate::schema::batchlog_detail;
use crate::utils::db_worker::{self, DbError};

pub fn insert(conn: &mut PgConnection, new_detail: &NewBatchlogDetail) -> Result<usize, DbError> {
    db_worker::execute(conn, diesel::insert_into(batchlog_detail::table).values(new_detail))
}

/// `MAX(log_no) + 1`, or 1 for a run without details. Call inside the
/// transaction that inserts the row.
pub fn next_log_no(conn: &mut PgConnection, id: Uuid) -> Result<i32, DbError> {
    let current: Option<Option<i32>> = db_worker::first_optional(
        conn,
        batchlog_detail::table
            .filter(batchlog_detail::uuid.eq(id))
            .select(max(batchlog_detail::log_no)),
    )?;
    Ok(current.flatten().unwrap_or(0) + 1)
}

/// Details of every given run, grouped in the same order as `mains`.
pub fn list_for(conn: &mut PgConnection, mains: &[BatchlogMain]) -> Result<Vec<Vec<BatchlogDetail>>, DbError> {
    if mains.is_empty() {
        return Ok(Vec::new());
    }
    let details: Vec<BatchlogDetail> = db_worker::load(
        conn,
        BatchlogDetail::belonging_to(mains)
            .select(BatchlogDetail::as_select())
            .order((batchlog_detail::uuid.asc(), batchlog_detail::log_no.asc())),
    )?;
    Ok(details.grouped_by(mains))
}
