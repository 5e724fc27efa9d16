use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::models::{NewSalary, Salary};
use crate::schema::salary;
use crate::utils::db_worker::{self, DbError};

pub fn list_all(conn: &mut PgConnection) -> Result<Vec<Salary>, DbError> {
    db_worker::load(
        conn,
        salary::table
            .order((salary::month.asc(), salary::deduction.asc(), salary::payment_item.asc()))
            .select(Salary::as_select()),
    )
}

/// Inclusive on both ends; either bound may be omitted.
pub fn list_by_month_range(
    conn: &mut PgConnection,
    start_ym: Option<&str>,
    end_ym: Option<&str>,
) -> Result<Vec<Salary>, DbError> {
    let mut query = salary::table.select(Salary::as_select()).into_boxed();
    if let Some(start) = start_ym {
        query = query.filter(salary::month.ge(start.to_string()));
    }
    if let Some(end) = end_ym {
        query = query.filter(salary::month.le(end.to_string()));
    }
    db_worker::load(
        conn,
        query.order((salary::month.asc(), salary::deduction.asc(), salary::payment_item.asc())),
    )
}

/// Insert, or on key conflict overwrite the amount and bump `exclusive_flag`.
/// `created_*` of an existing row is kept.
pub fn upsert(conn: &mut PgConnection, row: &NewSalary) -> Result<usize, DbError> {
    db_worker::execute(
        conn,
        diesel::insert_into(salary::table)
            .values(row)
            .on_conflict((salary::month, salary::deduction, salary::payment_item))
            .do_update()
            .set((
                salary::amount.eq(excluded(salary::amount)),
                salary::currency_code.eq(excluded(salary::currency_code)),
                salary::updated_by.eq(excluded(salary::updated_by)),
                salary::updated_at.eq(excluded(salary::updated_at)),
                salary::exclusive_flag.eq(salary::exclusive_flag + 1),
            )),
    )
}
