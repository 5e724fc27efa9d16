use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api_models::{ApiResponse, ApiResponseStatus};
use crate::services::{GmailError, ServiceError};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadGateway(String),
    InternalServerError(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, ApiResponseStatus, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiResponseStatus::BadRequest, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ApiResponseStatus::Unauthorized, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiResponseStatus::Forbidden, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponseStatus::NotFound, msg.clone()),
            AppError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                ApiResponseStatus::ServiceUnavailable,
                format!("Upstream request failed: {}", msg),
            ),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponseStatus::Error,
                format!("Internal server error: {}", msg),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status, message) = self.parts();
        if code.is_server_error() {
            tracing::error!("{} {}", code.as_u16(), message);
        }
        (code, Json(ApiResponse::failure(status, message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::SalaryMail(e) => AppError::InternalServerError(e.to_string()),
            ServiceError::Gmail(GmailError::MissingCredentials) => {
                AppError::InternalServerError(GmailError::MissingCredentials.to_string())
            }
            ServiceError::Gmail(e) => AppError::BadGateway(e.to_string()),
            ServiceError::Kabutan(e) => AppError::BadGateway(e.to_string()),
            ServiceError::Db(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}
