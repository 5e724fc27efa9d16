pub mod batchlog_detail;
pub mod batchlog_main;
pub mod salary;
pub mod stock;
