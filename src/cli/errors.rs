//! CLI-specific error types
//!
//! Every CLI error ends the process with exit status 1.

use std::fmt;
use std::io;

use crate::dataset::DatasetError;
use crate::explain::ExplainError;
use crate::model::ModelError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// No usable model, or the model cannot be explained
    ModelError,
    /// Input CSV rejected
    DatasetError,
    /// Explanation run failed
    ExplainError,
    /// HTTP server could not start or crashed
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CRED_CLI_CONFIG_ERROR",
            Self::IoError => "CRED_CLI_IO_ERROR",
            Self::ModelError => "CRED_CLI_MODEL_ERROR",
            Self::DatasetError => "CRED_CLI_DATASET_ERROR",
            Self::ExplainError => "CRED_CLI_EXPLAIN_ERROR",
            Self::ServeFailed => "CRED_CLI_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Server failure
    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        Self::new(CliErrorCode::ModelError, format!("[{}] {}", e.code(), e))
    }
}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        Self::new(CliErrorCode::DatasetError, format!("[{}] {}", e.code(), e))
    }
}

impl From<ExplainError> for CliError {
    fn from(e: ExplainError) -> Self {
        match e {
            ExplainError::Model(e) => e.into(),
            ExplainError::Dataset(e) => e.into(),
            other => Self::new(
                CliErrorCode::ExplainError,
                format!("[{}] {}", other.code(), other),
            ),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_code_then_message() {
        let err = CliError::config_error("bad");
        assert_eq!(err.to_string(), "CRED_CLI_CONFIG_ERROR: bad");
    }

    #[test]
    fn test_explain_error_unwraps_model_error() {
        let err: CliError = ExplainError::Model(ModelError::NotFound("m.json".into())).into();
        assert_eq!(err.code(), &CliErrorCode::ModelError);
        assert!(err.message().starts_with("[CRED_MODEL_NOT_FOUND]"));
    }

    #[test]
    fn test_feature_value_error_keeps_explain_code() {
        let err: CliError = ExplainError::InvalidFeatureValue {
            column: "debt_to_equity".into(),
            row: 2,
        }
        .into();
        assert_eq!(err.code_str(), "CRED_CLI_EXPLAIN_ERROR");
        assert!(err.message().contains("debt_to_equity"));
    }
}
