use serde::{Deserialize, Serialize};

/// Outcome reported in every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiResponseStatus {
    Success,
    Error,
    NotFound,
    Unauthorized,
    ValidationError,
    BadRequest,
    InternalServerError,
    NotImplemented,
    ServiceUnavailable,
    Forbidden,
}

/// `{ status, message, data }` envelope shared by success and error bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ApiResponseStatus,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: ApiResponseStatus, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }

    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::new(ApiResponseStatus::Success, message, Some(data))
    }
}

impl ApiResponse<()> {
    pub fn failure(status: ApiResponseStatus, message: impl Into<String>) -> Self {
        Self::new(status, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success("ok", vec![1, 2])).unwrap();
        assert_eq!(body, json!({"status": "success", "message": "ok", "data": [1, 2]}));
    }

    #[test]
    fn failure_has_null_data() {
        let body = serde_json::to_value(ApiResponse::failure(ApiResponseStatus::NotFound, "gone")).unwrap();
        assert_eq!(body, json!({"status": "not_found", "message": "gone", "data": null}));

        let status = serde_json::to_value(ApiResponseStatus::InternalServerError).unwrap();
        assert_eq!(status, json!("internal_server_error"));
    }
}
