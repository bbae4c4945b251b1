//! # Dataset Errors

use thiserror::Error;

/// Result type for upload parsing and export
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Problems with an uploaded issuer CSV or with writing the export.
///
/// Row numbers are 1-based and count data rows only (the header is not a row).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Upload is empty")]
    EmptyUpload,

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Upload has no feature columns")]
    NoFeatureColumns,

    #[error("Row {row}: cannot parse last_updated value '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Row {row}: issuer_id is empty")]
    InvalidIssuerId { row: usize },
}

impl DatasetError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            DatasetError::Csv(_) => "CRED_DATASET_CSV",
            DatasetError::EmptyUpload => "CRED_DATASET_EMPTY",
            DatasetError::DuplicateColumn(_) => "CRED_DATASET_DUPLICATE_COLUMN",
            DatasetError::NoFeatureColumns => "CRED_DATASET_NO_FEATURES",
            DatasetError::InvalidTimestamp { .. } => "CRED_DATASET_INVALID_TIMESTAMP",
            DatasetError::InvalidIssuerId { .. } => "CRED_DATASET_INVALID_ISSUER_ID",
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Csv(e.to_string())
    }
}
