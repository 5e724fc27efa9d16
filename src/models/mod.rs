pub mod batchlog;
pub mod money;
pub mod salary;
pub mod stock;

pub use batchlog::{
    Batchlog, BatchlogDetail, BatchlogMain, BatchlogStatus, FinishBatchlogMain, NewBatchlogDetail,
    NewBatchlogMain,
};
pub use money::Money;
pub use salary::{NewSalary, Salary};
pub use stock::{NewStock, Stock};
