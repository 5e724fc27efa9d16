pub mod clock;
pub mod config;
pub mod db_worker;
pub mod http_client;
pub mod logging;
pub mod middleware;
