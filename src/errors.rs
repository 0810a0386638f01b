use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("not found: {0}")]
    DataNotFound(String),

    #[error("conflicting data: {0}")]
    ConflictingData(String),

    /// Every field of an update matched the stored record.
    #[error("no data to update")]
    NoUpdatedData,

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::DataNotFound("record not found".to_string()),
            StoreError::Conflict(_)
            | StoreError::Overlap { .. }
            | StoreError::PaymentNotPending { .. } => AppError::ConflictingData(err.to_string()),
            StoreError::InvalidTransition { .. } => AppError::InvalidData(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AppError::DataNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictingData(_) => StatusCode::CONFLICT,
            AppError::NoUpdatedData => return StatusCode::NOT_MODIFIED.into_response(),
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                let body = serde_json::json!({ "error": "internal error" });
                return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
            }
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
