use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::SmallInt;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{batchlog_detail, batchlog_main};

/// Lifecycle of one batch run. Stored as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = SmallInt)]
pub enum BatchlogStatus {
    Running,
    Complete,
    Abort,
}

impl BatchlogStatus {
    pub fn code(self) -> i16 {
        match self {
            BatchlogStatus::Running => 0,
            BatchlogStatus::Complete => 3,
            BatchlogStatus::Abort => 9,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(BatchlogStatus::Running),
            3 => Some(BatchlogStatus::Complete),
            9 => Some(BatchlogStatus::Abort),
            _ => None,
        }
    }
}

impl fmt::Display for BatchlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchlogStatus::Running => "Running",
            BatchlogStatus::Complete => "Complete",
            BatchlogStatus::Abort => "Abort",
        };
        f.write_str(name)
    }
}

impl FromStr for BatchlogStatus {
    type Err = String;

    /// Accepts the variant name in any case, or the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i16>() {
            return Self::from_code(code).ok_or_else(|| format!("unknown batchlog status: {}", s));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "running" => Ok(BatchlogStatus::Running),
            "complete" => Ok(BatchlogStatus::Complete),
            "abort" => Ok(BatchlogStatus::Abort),
            _ => Err(format!("unknown batchlog status: {}", s)),
        }
    }
}

impl ToSql<SmallInt, Pg> for BatchlogStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let code = self.code();
        <i16 as ToSql<SmallInt, Pg>>::to_sql(&code, &mut out.reborrow())
    }
}

impl FromSql<SmallInt, Pg> for BatchlogStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let code = <i16 as FromSql<SmallInt, Pg>>::from_sql(bytes)?;
        BatchlogStatus::from_code(code).ok_or_else(|| format!("unknown batchlog status code {}", code).into())
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = batchlog_main)]
#[diesel(primary_key(uuid))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BatchlogMain {
    pub uuid: Uuid,
    pub status: BatchlogStatus,
    pub program_id: String,
    pub program_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = batchlog_main)]
pub struct NewBatchlogMain {
    pub uuid: Uuid,
    pub status: BatchlogStatus,
    pub program_id: String,
    pub program_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Status transition written when a run completes or aborts.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = batchlog_main)]
pub struct FinishBatchlogMain {
    pub status: BatchlogStatus,
    pub end_time: Option<NaiveDateTime>,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = batchlog_detail)]
#[diesel(primary_key(uuid, log_no))]
#[diesel(belongs_to(BatchlogMain, foreign_key = uuid))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BatchlogDetail {
    pub uuid: Uuid,
    pub log_no: i32,
    pub log_msg: Option<String>,
    pub log_time: NaiveDateTime,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = batchlog_detail)]
pub struct NewBatchlogDetail {
    pub uuid: Uuid,
    pub log_no: i32,
    pub log_msg: Option<String>,
    pub log_time: NaiveDateTime,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A batch run with its detail lines in `log_no` order.
#[derive(Debug, Clone)]
pub struct Batchlog {
    pub main: BatchlogMain,
    pub details: Vec<BatchlogDetail>,
}
