//! # Model Errors
//!
//! Error codes:
//! - CRED_MODEL_NOT_FOUND
//! - CRED_MODEL_UNREADABLE
//! - CRED_MODEL_MALFORMED
//! - CRED_MODEL_INCOMPATIBLE
//! - CRED_MODEL_UNSUPPORTED_TYPE
//! - CRED_MODEL_IO

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while loading, saving or interrogating a fitted model
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// No model file exists at the configured path
    #[error("No saved model found at {0}")]
    NotFound(String),

    /// The file exists but could not be read or parsed
    #[error("Model at {path} is unreadable: {reason}")]
    Unreadable { path: String, reason: String },

    /// The document parsed but its structure is invalid
    #[error("Malformed model: {0}")]
    Malformed(String),

    /// The model does not expose the feature names it was fit with
    #[error("Model is incompatible: {0}")]
    Incompatible(String),

    /// The model is not an additively decomposable tree ensemble
    #[error("Unsupported model type for contribution decomposition: {0}")]
    UnsupportedModelType(String),

    /// Failure while writing the model
    #[error("I/O error: {0}")]
    Io(String),
}

impl ModelError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::NotFound(_) => "CRED_MODEL_NOT_FOUND",
            ModelError::Unreadable { .. } => "CRED_MODEL_UNREADABLE",
            ModelError::Malformed(_) => "CRED_MODEL_MALFORMED",
            ModelError::Incompatible(_) => "CRED_MODEL_INCOMPATIBLE",
            ModelError::UnsupportedModelType(_) => "CRED_MODEL_UNSUPPORTED_TYPE",
            ModelError::Io(_) => "CRED_MODEL_IO",
        }
    }

    /// True when the dashboard should fall back to its "no model" state
    pub fn is_missing_model(&self) -> bool {
        matches!(
            self,
            ModelError::NotFound(_) | ModelError::Unreadable { .. } | ModelError::Malformed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ModelError::NotFound("m.json".into()).code(), "CRED_MODEL_NOT_FOUND");
        assert_eq!(
            ModelError::UnsupportedModelType("linear".into()).code(),
            "CRED_MODEL_UNSUPPORTED_TYPE"
        );
    }

    #[test]
    fn test_missing_model_classification() {
        assert!(ModelError::NotFound("x".into()).is_missing_model());
        assert!(ModelError::Unreadable {
            path: "x".into(),
            reason: "bad json".into()
        }
        .is_missing_model());
        assert!(!ModelError::Incompatible("no names".into()).is_missing_model());
    }
}
