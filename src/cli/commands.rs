//! CLI command implementations
//!
//! Each command loads the configuration, sets the log threshold, then
//! does its one job. Logs go to stderr; command output goes to stdout.

use std::fs;
use std::path::Path;

use serde_json::json;
use uuid::Uuid;

use crate::dataset::IssuerFrame;
use crate::explain::ExplanationEngine;
use crate::http_server::HttpServer;
use crate::model::FittedModel;
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_response, write_table};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Explain {
            config,
            input,
            output,
        } => explain(config.as_deref(), &input, output.as_deref()),
        Command::InspectModel { config } => inspect_model(config.as_deref()),
        Command::SaveModel { config, from } => save_model(config.as_deref(), &from),
    }
}

/// Load configuration and apply its log level
fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(path)?;
    Logger::set_min_severity(config.severity()?);

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<defaults>".to_string());
    let model_path = config.model_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("source", source.as_str()), ("model_path", model_path.as_str())],
    );

    Ok(config)
}

/// Start the dashboard server and block until it stops
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path)?;

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }

    let server = HttpServer::new(http_config, config.dashboard_state());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Explain `input` with the installed model and write the table as CSV
pub fn explain(config_path: Option<&Path>, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let run_id = Uuid::new_v4().to_string();

    let model = config.model_store().load()?;

    let file = fs::File::open(input).map_err(|e| {
        CliError::io_error(format!("Failed to open {}: {}", input.display(), e))
    })?;
    let frame = IssuerFrame::from_csv_reader(file)?;

    let rows = frame.len().to_string();
    log_event_with_fields(
        Event::ExplainStart,
        &[
            ("run_id", run_id.as_str()),
            ("rows", rows.as_str()),
            ("model_kind", model.estimator.kind()),
        ],
    );

    let table = ExplanationEngine::with_settings(&model, config.explain.clone())
        .and_then(|engine| engine.explain(&frame))
        .map_err(|e| {
            let reason = e.to_string();
            log_event_with_fields(
                Event::ExplainFailed,
                &[
                    ("run_id", run_id.as_str()),
                    ("code", e.code()),
                    ("reason", reason.as_str()),
                ],
            );
            CliError::from(e)
        })?;

    if !table.zero_filled_features.is_empty() {
        let features = table.zero_filled_features.join(",");
        log_event_with_fields(
            Event::FeaturesZeroFilled,
            &[("run_id", run_id.as_str()), ("features", features.as_str())],
        );
    }

    write_table(&table.records, output)?;

    let explained = table.len().to_string();
    log_event_with_fields(
        Event::ExplainComplete,
        &[("run_id", run_id.as_str()), ("rows", explained.as_str())],
    );
    if let Some(path) = output {
        let path = path.display().to_string();
        log_event_with_fields(
            Event::ExportWritten,
            &[("run_id", run_id.as_str()), ("path", path.as_str())],
        );
    }

    Ok(())
}

/// Print metadata and fingerprint of the installed model
pub fn inspect_model(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = config.model_store();

    let model = store.load()?;
    let sha256 = store.fingerprint()?;

    let path = store.path().display().to_string();
    log_event_with_fields(
        Event::ModelLoaded,
        &[("path", path.as_str()), ("sha256", sha256.as_str())],
    );

    write_response(json!({
        "path": path,
        "sha256": sha256,
        "model": serde_json::to_value(model.metadata())?,
    }))
}

/// Validate the model document at `from` and install it at the configured path
pub fn save_model(config_path: Option<&Path>, from: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = config.model_store();

    let content = fs::read_to_string(from).map_err(|e| {
        CliError::io_error(format!("Failed to read {}: {}", from.display(), e))
    })?;
    let model = FittedModel::from_json(&content)?;

    store.save(&model)?;
    let sha256 = store.fingerprint()?;

    let path = store.path().display().to_string();
    log_event_with_fields(
        Event::ModelSaved,
        &[
            ("path", path.as_str()),
            ("kind", model.estimator.kind()),
            ("sha256", sha256.as_str()),
        ],
    );

    write_response(json!({
        "path": path,
        "sha256": sha256,
        "model": serde_json::to_value(model.metadata())?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, ModelStore, TreeNode};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, model_path: &Path) -> PathBuf {
        let config_path = dir.path().join("credscope.json");
        let config = json!({ "model_path": model_path, "log_level": "error" });
        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn stump_json() -> String {
        FittedModel::decision_tree(
            vec!["leverage".to_string()],
            DecisionTree::new(vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 1,
                    right: 2,
                    value: 50.0,
                },
                TreeNode::Leaf { value: 70.0 },
                TreeNode::Leaf { value: 30.0 },
            ]),
        )
        .to_json()
        .unwrap()
    }

    #[test]
    fn test_save_model_then_explain_to_file() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("models").join("tree.json");
        let config_path = write_config(&dir, &model_path);

        let source = dir.path().join("source.json");
        fs::write(&source, stump_json()).unwrap();
        save_model(Some(&config_path), &source).unwrap();
        assert!(ModelStore::new(&model_path).exists());

        let input = dir.path().join("issuers.csv");
        fs::write(&input, "issuer_id,leverage\n1,0.5\n2,3.0\n").unwrap();
        let output = dir.path().join("out.csv");
        explain(Some(&config_path), &input, Some(&output)).unwrap();

        let csv = fs::read_to_string(&output).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("issuer_id,predicted_score,short_term_trend,long_term_trend,explanation")
        );
        assert!(csv.contains("1,70.0,70.0,70.0,"));
        assert!(csv.contains("2,30.0,30.0,30.0,"));
    }

    #[test]
    fn test_explain_without_model_reports_model_error() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, &dir.path().join("missing.json"));
        let input = dir.path().join("issuers.csv");
        fs::write(&input, "leverage\n1.0\n").unwrap();

        let err = explain(Some(&config_path), &input, None).unwrap_err();
        assert_eq!(err.code_str(), "CRED_CLI_MODEL_ERROR");
    }

    #[test]
    fn test_save_model_rejects_invalid_document() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("tree.json");
        let config_path = write_config(&dir, &model_path);
        let source = dir.path().join("source.json");
        fs::write(&source, "{\"type\": \"unknown\"}").unwrap();

        assert!(save_model(Some(&config_path), &source).is_err());
        assert!(!model_path.exists());
    }
}
