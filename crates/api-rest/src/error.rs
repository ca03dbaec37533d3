//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use registry_core::{FormReport, RegistryError, StorageError};
use serde::Serialize;

/// Structured error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The submission did not validate; the report is re-rendered as the body.
    #[error("submission for {} did not validate", .0.form)]
    Invalid(Box<FormReport>),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn storage_parts(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        StorageError::Unavailable(_) => {
            tracing::error!("Storage error: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal error".to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Invalid(report) => {
                tracing::warn!(form = %report.form, errors = report.errors.len(), "rejected submission");
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(report)).into_response();
            }
            ApiError::Registry(RegistryError::UnknownForm(_) | RegistryError::UnknownEnum(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
            }
            ApiError::Registry(RegistryError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            ApiError::Registry(RegistryError::Storage(err)) | ApiError::Storage(err) => {
                storage_parts(err)
            }
            ApiError::Registry(RegistryError::InvalidConfig(_)) => {
                tracing::error!("Configuration error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}
