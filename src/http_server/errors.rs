//! # Dashboard Errors
//!
//! Every failure is surfaced to the dashboard as a JSON message; nothing is
//! retried and no partial table is returned.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::dataset::DatasetError;
use crate::explain::ExplainError;
use crate::model::ModelError;

/// Message shown while no usable model is installed
pub const NO_MODEL_MESSAGE: &str = "No saved model found. Please train and save the model first.";

/// Result type for dashboard handlers
pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// No usable model at the configured path
    #[error("No saved model found. Please train and save the model first.")]
    NoModel,

    /// Multipart body missing or unreadable
    #[error("Invalid upload: {0}")]
    BadUpload(String),

    /// Body exceeded `max_upload_bytes`
    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    #[error("{0}")]
    Dataset(#[from] DatasetError),

    #[error("{0}")]
    Explain(ExplainError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ExplainError> for DashboardError {
    fn from(err: ExplainError) -> Self {
        match err {
            ExplainError::Dataset(e) => DashboardError::Dataset(e),
            ExplainError::Model(e) if e.is_missing_model() => DashboardError::NoModel,
            other => DashboardError::Explain(other),
        }
    }
}

impl From<MultipartError> for DashboardError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            DashboardError::UploadTooLarge(err.body_text())
        } else {
            DashboardError::BadUpload(err.body_text())
        }
    }
}

impl From<ModelError> for DashboardError {
    fn from(err: ModelError) -> Self {
        ExplainError::Model(err).into()
    }
}

impl DashboardError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::NoModel => StatusCode::NOT_FOUND,
            DashboardError::BadUpload(_) => StatusCode::BAD_REQUEST,
            DashboardError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            DashboardError::Dataset(_) => StatusCode::BAD_REQUEST,
            DashboardError::Explain(e) => match e {
                ExplainError::Model(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ExplainError::InvalidFeatureValue { .. } | ExplainError::Dataset(_) => {
                    StatusCode::BAD_REQUEST
                }
                ExplainError::InvalidSettings(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::NoModel => "CRED_MODEL_NOT_FOUND",
            DashboardError::BadUpload(_) => "CRED_HTTP_BAD_UPLOAD",
            DashboardError::UploadTooLarge(_) => "CRED_HTTP_UPLOAD_TOO_LARGE",
            DashboardError::Dataset(e) => e.code(),
            DashboardError::Explain(e) => e.code(),
            DashboardError::Internal(_) => "CRED_HTTP_INTERNAL",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub error_code: String,
}

impl From<&DashboardError> for ErrorResponse {
    fn from(err: &DashboardError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
            error_code: err.error_code().to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_maps_to_no_model() {
        let err: DashboardError = ModelError::NotFound("m.json".into()).into();
        assert!(matches!(err, DashboardError::NoModel));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), NO_MODEL_MESSAGE);
    }

    #[test]
    fn test_incompatible_model_is_unprocessable() {
        let err: DashboardError = ModelError::Incompatible("no names".into()).into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "CRED_MODEL_INCOMPATIBLE");
    }

    #[test]
    fn test_upload_too_large_is_413() {
        let err = DashboardError::UploadTooLarge("length limit exceeded".into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "CRED_HTTP_UPLOAD_TOO_LARGE");
    }

    #[test]
    fn test_dataset_errors_are_bad_request() {
        let err: DashboardError = ExplainError::Dataset(DatasetError::EmptyUpload).into();
        assert!(matches!(err, DashboardError::Dataset(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
