//! Configuration file
//!
//! A JSON object; every field is optional. Running without `--config`
//! is the same as an empty object.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::DEFAULT_EXPORT_FILE_NAME;
use crate::explain::ExplainSettings;
use crate::http_server::{DashboardState, HttpServerConfig};
use crate::model::ModelStore;
use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the fitted model is stored
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// File name offered for the CSV download
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,

    /// Rows shown by the upload preview (default: 5)
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Minimum log severity: trace, info, warn or error (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(flatten)]
    pub explain: ExplainSettings,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("decision_tree_credit_model.json")
}
fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}
fn default_preview_rows() -> usize {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            export_file_name: default_export_file_name(),
            preview_rows: default_preview_rows(),
            log_level: default_log_level(),
            explain: ExplainSettings::default(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate a configuration document
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        self.explain
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))?;

        self.severity()?;

        if self.export_file_name.trim().is_empty() {
            return Err(CliError::config_error("export_file_name must not be empty"));
        }

        if self.http.max_upload_bytes == 0 {
            return Err(CliError::config_error("http.max_upload_bytes must be > 0"));
        }

        Ok(())
    }

    /// Minimum log severity named by `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn or error.",
                self.log_level
            ))
        })
    }

    pub fn model_store(&self) -> ModelStore {
        ModelStore::new(&self.model_path)
    }

    /// Dashboard state described by this configuration
    pub fn dashboard_state(&self) -> DashboardState {
        DashboardState::new(self.model_store())
            .with_settings(self.explain.clone())
            .with_export_file_name(self.export_file_name.clone())
            .with_preview_rows(self.preview_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model_path, PathBuf::from("decision_tree_credit_model.json"));
        assert_eq!(config.explain.long_term_window, 10);
        assert_eq!(config.http.port, 8501);
    }

    #[test]
    fn test_flattened_explain_settings() {
        let config = Config::from_json(
            r#"{"short_term_window": 2, "top_features": 5, "http": {"port": 9000}}"#,
        )
        .unwrap();
        assert_eq!(config.explain.short_term_window, 2);
        assert_eq!(config.explain.long_term_window, 10);
        assert_eq!(config.explain.top_features, 5);
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = Config::from_json(r#"{"long_term_window": 0}"#).unwrap_err();
        assert_eq!(err.code_str(), "CRED_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let err = Config::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
        assert!(err.message().contains("loud"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("credscope.json");
        fs::write(&path, r#"{"model_path": "/models/tree.json", "preview_rows": 10}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/tree.json"));
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/credscope.json")).unwrap_err();
        assert_eq!(err.code_str(), "CRED_CLI_CONFIG_ERROR");
    }
}
