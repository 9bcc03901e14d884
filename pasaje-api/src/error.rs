use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pasaje_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    InternalServerError(String),
    GatewayTimeout(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
            AppError::GatewayTimeout(msg) => {
                tracing::error!("Storage timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, "Storage timed out".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(_) | CoreError::Unavailable(_) => AppError::NotFoundError(err.to_string()),
            CoreError::InvalidInput(_) => AppError::ValidationError(err.to_string()),
            CoreError::StorageTimeout(_) => AppError::GatewayTimeout(err.to_string()),
            CoreError::StorageUnavailable(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Non-negative count from a request field.
pub fn parse_count(field: &str, value: i64) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| AppError::ValidationError(format!("{} must be a non-negative integer", field)))
}
