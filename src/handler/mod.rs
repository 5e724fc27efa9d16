pub mod batchlog;
pub mod error;
pub mod extract;
pub mod gmail;
pub mod kabutan;
pub mod salary;
pub mod stock;

use crate::app::AppState;

/// Audit user for a request; falls back to the application name.
pub(crate) fn user_or_default(user_name: Option<String>, state: &AppState) -> String {
    user_name
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| state.config.application_name.clone())
}
