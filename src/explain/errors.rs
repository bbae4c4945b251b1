//! # Explanation Errors

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::model::ModelError;

/// Result type for the explanation engine
pub type ExplainResult<T> = Result<T, ExplainError>;

/// Reasons an explanation run is aborted. Runs are all-or-nothing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExplainError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// A model feature is present in the upload but a row has no usable number
    #[error("Row {row}: feature '{column}' is empty or not numeric")]
    InvalidFeatureValue { column: String, row: usize },

    #[error("Invalid explanation settings: {0}")]
    InvalidSettings(String),
}

impl ExplainError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ExplainError::Model(e) => e.code(),
            ExplainError::Dataset(e) => e.code(),
            ExplainError::InvalidFeatureValue { .. } => "CRED_EXPLAIN_INVALID_FEATURE_VALUE",
            ExplainError::InvalidSettings(_) => "CRED_EXPLAIN_INVALID_SETTINGS",
        }
    }
}
