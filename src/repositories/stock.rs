use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::models::{NewStock, Stock};
use crate::schema::stock;
use crate::utils::db_worker::{self, DbError};

pub fn list_all(conn: &mut PgConnection) -> Result<Vec<Stock>, DbError> {
    db_worker::load(
        conn,
        stock::table.order(stock::code.asc()).select(Stock::as_select()),
    )
}

pub fn find_by_code(conn: &mut PgConnection, code: &str) -> Result<Option<Stock>, DbError> {
    db_worker::first_optional(
        conn,
        stock::table
            .filter(stock::code.eq(code))
            .select(Stock::as_select()),
    )
}

pub fn upsert(conn: &mut PgConnection, row: &NewStock) -> Result<usize, DbError> {
    db_worker::execute(
        conn,
        diesel::insert_into(stock::table)
            .values(row)
            .on_conflict(stock::code)
            .do_update()
            .set((
                stock::name.eq(excluded(stock::name)),
                stock::quantity.eq(excluded(stock::quantity)),
                stock::purchase_price.eq(excluded(stock::purchase_price)),
                stock::purchase_date.eq(excluded(stock::purchase_date)),
                stock::memo.eq(excluded(stock::memo)),
                stock::updated_at.eq(excluded(stock::updated_at)),
            )),
    )
}

pub fn delete_by_code(conn: &mut PgConnection, code: &str) -> Result<usize, DbError> {
    db_worker::execute(conn, diesel::delete(stock::table.filter(stock::code.eq(code))))
}
