use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::EcommerceError;

/// Error returned by every handler. The body is always `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] EcommerceError),

    #[error("{0}")]
    Body(#[from] JsonRejection),

    #[error("{0}")]
    Path(#[from] PathRejection),

    #[error("{0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Domain(EcommerceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Domain(EcommerceError::Validation(_)) | Self::Body(_) | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            // a malformed id cannot name an existing record
            Self::Path(_) => StatusCode::NOT_FOUND,
            Self::Domain(EcommerceError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
