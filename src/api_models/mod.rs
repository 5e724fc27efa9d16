pub mod batchlog;
pub mod kabutan;
pub mod response;
pub mod salary;
pub mod stock;

pub use response::{ApiResponse, ApiResponseStatus};
