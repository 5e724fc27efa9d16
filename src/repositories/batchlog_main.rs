use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::models::{BatchlogMain, BatchlogStatus, FinishBatchlogMain, NewBatchlogMain};
use crate::schema::batchlog_main;
use crate::utils::db_worker::{self, DbError};

pub fn insert(conn: &mut PgConnection, new_main: &NewBatchlogMain) -> Result<usize, DbError> {
    db_worker::execute(conn, diesel::insert_into(batchlog_main::table).values(new_main))
}

pub fn find_by_uuid(conn: &mut PgConnection, id: Uuid) -> Result<Option<BatchlogMain>, DbError> {
    db_worker::first_optional(
        conn,
        batchlog_main::table
            .filter(batchlog_main::uuid.eq(id))
            .select(BatchlogMain::as_select()),
    )
}

/// 開始日時の新しい順
pub fn list_all(conn: &mut PgConnection) -> Result<Vec<BatchlogMain>, DbError> {
    db_worker::load(
        conn,
        batchlog_main::table
            .order(batchlog_main::start_time.desc())
            .select(BatchlogMain::as_select()),
    )
}

/// `%kw%` with `\`, `%` and `_` in `kw` escaped so they match literally.
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `keyword` is matched case-insensitively against program id and name.
pub fn search(
    conn: &mut PgConnection,
    keyword: Option<&str>,
    status: Option<BatchlogStatus>,
) -> Result<Vec<BatchlogMain>, DbError> {
    let mut query = batchlog_main::table
        .select(BatchlogMain::as_select())
        .into_boxed();

    if let Some(kw) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
        let pattern = contains_pattern(kw);
        query = query.filter(
            batchlog_main::program_id
                .ilike(pattern.clone())
                .or(batchlog_main::program_name.ilike(pattern)),
        );
    }
    if let Some(st) = status {
        query = query.filter(batchlog_main::status.eq(st));
    }

    db_worker::load(conn, query.order(batchlog_main::start_time.desc()))
}

pub fn finish(conn: &mut PgConnection, id: Uuid, changes: &FinishBatchlogMain) -> Result<usize, DbError> {
    db_worker::execute(
        conn,
        diesel::update(batchlog_main::table.filter(batchlog_main::uuid.eq(id))).set(changes),
    )
}

/// Bumps the audit columns, used when a detail line is appended.
pub fn touch(conn: &mut PgConnection, id: Uuid, user: &str, now: chrono::NaiveDateTime) -> Result<usize, DbError> {
    db_worker::execute(
        conn,
        diesel::update(batchlog_main::table.filter(batchlog_main::uuid.eq(id))).set((
            batchlog_main::updated_by.eq(user),
            batchlog_main::updated_at.eq(now),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_wildcards_are_escaped() {
        assert_eq!(contains_pattern("JOB01"), "%JOB01%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("job_a"), "%job\\_a%");
        assert_eq!(contains_pattern(r"C:\tmp"), r"%C:\\tmp%");
    }
}
