use diesel::pg::PgConnection;
use uuid::Uuid;

use crate::models::{
    Batchlog, BatchlogMain, BatchlogStatus, FinishBatchlogMain, NewBatchlogDetail, NewBatchlogMain,
};
use crate::repositories::{batchlog_detail, batchlog_main};
use crate::services::ServiceError;
use crate::utils::clock::now_local;
use crate::utils::db_worker::DbWorker;

pub const MSG_STARTED: &str = "Batch started.";
pub const MSG_COMPLETED: &str = "Batch completed.";
pub const MSG_ABORTED: &str = "Batch aborted.";

pub fn parse_uuid(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::Validation(format!("Invalid uuid: '{}'.", raw)))
}

pub fn parse_status(raw: &str) -> Result<BatchlogStatus, ServiceError> {
    raw.parse::<BatchlogStatus>()
        .map_err(|_| ServiceError::Validation(format!("Invalid status: '{}'.", raw)))
}

fn load(conn: &mut PgConnection, id: Uuid) -> Result<Batchlog, ServiceError> {
    let main = batchlog_main::find_by_uuid(conn, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Batchlog with UUID '{}' not found.", id)))?;
    let details = batchlog_detail::list_for(conn, std::slice::from_ref(&main))?
        .into_iter()
        .next()
        .unwrap_or_default();
    Ok(Batchlog { main, details })
}

fn attach_details(conn: &mut PgConnection, mains: Vec<BatchlogMain>) -> Result<Vec<Batchlog>, ServiceError> {
    let grouped = batchlog_detail::list_for(conn, &mains)?;
    Ok(mains
        .into_iter()
        .zip(grouped)
        .map(|(main, details)| Batchlog { main, details })
        .collect())
}

fn append_detail(
    conn: &mut PgConnection,
    id: Uuid,
    log_msg: Option<String>,
    user: &str,
) -> Result<i32, ServiceError> {
    let now = now_local();
    let log_no = batchlog_detail::next_log_no(conn, id)?;
    batchlog_detail::insert(
        conn,
        &NewBatchlogDetail {
            uuid: id,
            log_no,
            log_msg,
            log_time: now,
            created_by: user.to_string(),
            updated_by: user.to_string(),
            created_at: now,
            updated_at: now,
        },
    )?;
    Ok(log_no)
}

pub fn list_all(db: &DbWorker) -> Result<Vec<Batchlog>, ServiceError> {
    let mut conn = db.conn()?;
    let mains = batchlog_main::list_all(&mut conn)?;
    attach_details(&mut conn, mains)
}

pub fn search(db: &DbWorker, keyword: Option<&str>, status: Option<&str>) -> Result<Vec<Batchlog>, ServiceError> {
    let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    let mut conn = db.conn()?;
    let mains = batchlog_main::search(&mut conn, keyword, status)?;
    attach_details(&mut conn, mains)
}

pub fn get(db: &DbWorker, id: Uuid) -> Result<Batchlog, ServiceError> {
    let mut conn = db.conn()?;
    load(&mut conn, id)
}

/// Opens a new run with status `Running` and its first detail line.
pub fn begin(
    db: &DbWorker,
    program_id: &str,
    program_name: Option<&str>,
    user: &str,
) -> Result<Batchlog, ServiceError> {
    let program_id = program_id.trim();
    if program_id.is_empty() {
        return Err(ServiceError::Validation("programId is required.".to_string()));
    }
    let program_name = program_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(program_id);

    let id = Uuid::new_v4();
    let now = now_local();
    let main = NewBatchlogMain {
        uuid: id,
        status: BatchlogStatus::Running,
        program_id: program_id.to_string(),
        program_name: program_name.to_string(),
        start_time: now,
        end_time: None,
        created_by: user.to_string(),
        updated_by: user.to_string(),
        created_at: now,
        updated_at: now,
    };

    let batchlog = db.transaction(|conn| {
        batchlog_main::insert(conn, &main)?;
        append_detail(conn, id, Some(MSG_STARTED.to_string()), user)?;
        load(conn, id)
    })?;
    tracing::info!("batch {} started: {}", id, program_id);
    Ok(batchlog)
}

pub fn complete(db: &DbWorker, id: Uuid, user: &str) -> Result<Batchlog, ServiceError> {
    finish(db, id, BatchlogStatus::Complete, MSG_COMPLETED, user)
}

pub fn abort(db: &DbWorker, id: Uuid, user: &str) -> Result<Batchlog, ServiceError> {
    finish(db, id, BatchlogStatus::Abort, MSG_ABORTED, user)
}

fn finish(
    db: &DbWorker,
    id: Uuid,
    status: BatchlogStatus,
    message: &str,
    user: &str,
) -> Result<Batchlog, ServiceError> {
    let now = now_local();
    let changes = FinishBatchlogMain {
        status,
        end_time: Some(now),
        updated_by: user.to_string(),
        updated_at: now,
    };

    let batchlog = db.transaction(|conn| {
        if batchlog_main::finish(conn, id, &changes)? == 0 {
            return Err(ServiceError::NotFound(format!("Batchlog with UUID '{}' not found.", id)));
        }
        append_detail(conn, id, Some(message.to_string()), user)?;
        load(conn, id)
    })?;
    tracing::info!("batch {} -> {}", id, status);
    Ok(batchlog)
}

/// Appends one free-form detail line to an existing run.
pub fn add_log(db: &DbWorker, id: Uuid, log_msg: Option<String>, user: &str) -> Result<Batchlog, ServiceError> {
    db.transaction(|conn| {
        if batchlog_main::find_by_uuid(conn, id)?.is_none() {
            return Err(ServiceError::NotFound(format!("Batchlog with UUID '{}' not found.", id)));
        }
        append_detail(conn, id, log_msg, user)?;
        batchlog_main::touch(conn, id, user, now_local())?;
        load(conn, id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_uuid() {
        assert!(matches!(parse_uuid("not-a-uuid"), Err(ServiceError::Validation(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&format!(" {} ", id)).unwrap(), id);
    }

    #[test]
    fn status_filter_must_be_known() {
        assert_eq!(parse_status("complete").unwrap(), BatchlogStatus::Complete);
        let err = parse_status("finished").unwrap_err();
        assert_eq!(err.to_string(), "Invalid status: 'finished'.");
    }
}
