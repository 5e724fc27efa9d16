use diesel::debug_query;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::methods::ExecuteDsl;
use diesel::query_dsl::LoadQuery;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use thiserror::Error;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type PgPoolConn = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection unavailable: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Query(#[from] diesel::result::Error),
}

/// Builds the r2d2 pool. Connections are established eagerly so a bad
/// `DATABASE_URL` fails at startup.
pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size.max(1)).build(manager)
}

/// Hands out pooled connections and transaction scopes to the services.
#[derive(Clone)]
pub struct DbWorker {
    pool: DbPool,
}

impl DbWorker {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn conn(&self) -> Result<PgPoolConn, DbError> {
        self.pool.get().map_err(|e| {
            tracing::error!("failed to check out a database connection: {}", e);
            DbError::Pool(e)
        })
    }

    /// Runs `f` in a single transaction on one connection.
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise. Nested calls on the
    /// same connection become savepoints.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E>,
        E: From<DbError> + From<diesel::result::Error>,
    {
        let mut pooled = self.conn()?;
        let conn: &mut PgConnection = &mut pooled;
        conn.transaction(f)
    }
}

/// Executes a statement and returns the affected row count.
pub fn execute<Q>(conn: &mut PgConnection, query: Q) -> Result<usize, DbError>
where
    Q: ExecuteDsl<PgConnection> + QueryFragment<Pg>,
{
    let sql = debug_query::<Pg, _>(&query).to_string();
    tracing::debug!("Executing SQL: {}", sql);
    ExecuteDsl::execute(query, conn).map_err(|e| {
        tracing::error!("SQL failed: {} | {}", e, sql);
        DbError::Query(e)
    })
}

/// Runs a query and maps every row into `U`.
pub fn load<'q, Q, U>(conn: &mut PgConnection, query: Q) -> Result<Vec<U>, DbError>
where
    Q: RunQueryDsl<PgConnection> + LoadQuery<'q, PgConnection, U> + QueryFragment<Pg>,
{
    let sql = debug_query::<Pg, _>(&query).to_string();
    tracing::debug!("Executing SQL: {}", sql);
    query.load::<U>(conn).map_err(|e| {
        tracing::error!("SQL failed: {} | {}", e, sql);
        DbError::Query(e)
    })
}

/// Like [`load`] but keeps only the first row. Callers restrict the query
/// (primary key or `LIMIT 1`) themselves.
pub fn first_optional<'q, Q, U>(conn: &mut PgConnection, query: Q) -> Result<Option<U>, DbError>
where
    Q: RunQueryDsl<PgConnection> + LoadQuery<'q, PgConnection, U> + QueryFragment<Pg>,
{
    Ok(load(conn, query)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::stock;

    #[test]
    fn debug_sql_shows_statement_and_binds() {
        let query = stock::table.filter(stock::code.eq("7203")).select(stock::name);
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("FROM \"stock\""));
        assert!(sql.contains("\"stock\".\"code\" = $1"));
        assert!(sql.contains("7203"));
    }

    #[test]
    fn pool_errors_are_reported_as_pool_failures() {
        let manager = ConnectionManager::<PgConnection>::new("postgres://127.0.0.1:1/none");
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(0))
            .connection_timeout(std::time::Duration::from_millis(200))
            .build_unchecked(manager);
        let worker = DbWorker::new(pool);

        let err = worker.conn().err().expect("connection must fail");
        assert!(matches!(err, DbError::Pool(_)));
    }
}
