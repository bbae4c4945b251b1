//! Dashboard shared state
//!
//! Holds configuration and counters only. The model is re-read from the
//! store on every request.

use uuid::Uuid;

use crate::dataset::{IssuerFrame, DEFAULT_EXPORT_FILE_NAME};
use crate::explain::{ExplainSettings, ExplanationEngine, ExplanationTable};
use crate::model::{FittedModel, ModelStore};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

use super::errors::{DashboardError, DashboardResult};

/// State shared across dashboard handlers
#[derive(Debug)]
pub struct DashboardState {
    pub store: ModelStore,
    pub settings: ExplainSettings,
    pub export_file_name: String,
    pub preview_rows: usize,
    pub metrics: MetricsRegistry,
}

/// One finished explanation run
#[derive(Debug)]
pub struct ExplanationRun {
    pub run_id: Uuid,
    pub table: ExplanationTable,
}

impl DashboardState {
    /// State with default settings
    pub fn new(store: ModelStore) -> Self {
        Self {
            store,
            settings: ExplainSettings::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            preview_rows: 5,
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn with_settings(mut self, settings: ExplainSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Load the installed model, counting and logging failures
    pub fn load_model(&self) -> DashboardResult<FittedModel> {
        self.store.load().map_err(|e| {
            self.metrics.increment_model_load_failures();
            let path = self.store.path().display().to_string();
            let reason = e.to_string();
            log_event_with_fields(
                Event::ModelMissing,
                &[("path", path.as_str()), ("reason", reason.as_str())],
            );
            DashboardError::from(e)
        })
    }

    /// Parse an uploaded CSV and explain it with the installed model
    pub fn explain_upload(&self, upload: &[u8]) -> DashboardResult<ExplanationRun> {
        let run_id = Uuid::new_v4();
        let run_id_str = run_id.to_string();

        let model = self.load_model()?;

        let frame = IssuerFrame::from_csv_bytes(upload).map_err(|e| {
            self.metrics.increment_uploads_rejected();
            let reason = e.to_string();
            log_event_with_fields(
                Event::UploadRejected,
                &[("run_id", run_id_str.as_str()), ("reason", reason.as_str())],
            );
            DashboardError::from(e)
        })?;

        let row_count = frame.len().to_string();
        log_event_with_fields(
            Event::ExplainStart,
            &[
                ("run_id", run_id_str.as_str()),
                ("rows", row_count.as_str()),
                ("model_kind", model.estimator.kind()),
            ],
        );

        let table = ExplanationEngine::with_settings(&model, self.settings.clone())
            .and_then(|engine| engine.explain(&frame))
            .map_err(|e| {
                self.metrics.increment_explain_failures();
                let reason = e.to_string();
                log_event_with_fields(
                    Event::ExplainFailed,
                    &[
                        ("run_id", run_id_str.as_str()),
                        ("code", e.code()),
                        ("reason", reason.as_str()),
                    ],
                );
                DashboardError::from(e)
            })?;

        if !table.zero_filled_features.is_empty() {
            let features = table.zero_filled_features.join(",");
            log_event_with_fields(
                Event::FeaturesZeroFilled,
                &[("run_id", run_id_str.as_str()), ("features", features.as_str())],
            );
        }

        self.metrics.record_explain_run(table.len() as u64);
        let explained = table.len().to_string();
        log_event_with_fields(
            Event::ExplainComplete,
            &[("run_id", run_id_str.as_str()), ("rows", explained.as_str())],
        );

        Ok(ExplanationRun { run_id, table })
    }
}
