pub mod batchlog;
pub mod gmail;
pub mod kabutan;
pub mod salary;
pub mod salary_mail_parser;
pub mod stock;

use thiserror::Error;

use crate::utils::db_worker::DbError;

pub use gmail::GmailError;
pub use kabutan::KabutanError;
pub use salary_mail_parser::SalaryMailError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Gmail(#[from] GmailError),
    #[error(transparent)]
    Kabutan(#[from] KabutanError),
    #[error(transparent)]
    SalaryMail(#[from] SalaryMailError),
}

impl From<diesel::result::Error> for ServiceError {
    fn from(e: diesel::result::Error) -> Self {
        ServiceError::Db(DbError::Query(e))
    }
}
