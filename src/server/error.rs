use crate::catalog::CatalogError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

/// Error type for HTTP handlers, rendered as `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The request body is missing, not JSON, or lacks required fields.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn classify_catalog_error(err: &CatalogError) -> (StatusCode, &'static str, String) {
    match err {
        CatalogError::Validation { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        CatalogError::DanglingReference { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "DANGLING_REFERENCE",
            err.to_string(),
        ),
        CatalogError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE", err.to_string()),
        CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CatalogError::Storage(store_err) => {
            error!(error = %store_err, "Catalog storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Catalog(err) => classify_catalog_error(err),
            ApiError::InvalidBody(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    rejection.body_text(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
