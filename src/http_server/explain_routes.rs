//! Explanation HTTP Routes
//!
//! - `GET  /model`            installed model metadata, or the "no model" state
//! - `POST /upload/preview`   first rows of an upload, before scoring
//! - `POST /explain`          explanation table as JSON
//! - `POST /explain/download` explanation table as a CSV attachment
//!
//! Uploads are multipart forms; the `file` field is used, or the first
//! field when none is named `file`.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::dataset::{explanations_to_csv, UploadPreview};
use crate::explain::ExplanationRecord;
use crate::model::ModelMetadata;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{DashboardError, DashboardResult};
use super::state::DashboardState;

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub path: String,
    pub sha256: String,
    #[serde(flatten)]
    pub metadata: ModelMetadata,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub run_id: String,
    pub row_count: usize,
    pub feature_names: Vec<String>,
    pub zero_filled_features: Vec<String>,
    pub records: Vec<ExplanationRecord>,
}

// ==================
// Explain Routes
// ==================

/// Create explanation routes
pub fn explain_routes(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/model", get(model_status_handler))
        .route("/upload/preview", post(preview_handler))
        .route("/explain", post(explain_handler))
        .route("/explain/download", post(download_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Read the uploaded file out of a multipart body
async fn read_upload(
    state: &DashboardState,
    mut multipart: Multipart,
) -> DashboardResult<Vec<u8>> {
    state.metrics.increment_uploads_received();

    let mut fallback = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(reject_upload(state, e.into())),
        };

        let is_file = field.name() == Some("file");
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| reject_upload(state, e.into()))?;

        let size = data.len().to_string();
        log_event_with_fields(
            Event::UploadReceived,
            &[("file_name", file_name.as_str()), ("bytes", size.as_str())],
        );

        if is_file {
            return Ok(data.to_vec());
        }
        if fallback.is_none() {
            fallback = Some(data.to_vec());
        }
    }

    fallback.ok_or_else(|| {
        reject_upload(state, DashboardError::BadUpload("No file provided".to_string()))
    })
}

/// Count and log an upload that could not be read
fn reject_upload(state: &DashboardState, err: DashboardError) -> DashboardError {
    state.metrics.increment_uploads_rejected();
    let reason = err.to_string();
    log_event_with_fields(
        Event::UploadRejected,
        &[("code", err.error_code()), ("reason", reason.as_str())],
    );
    err
}

// ==================
// Handlers
// ==================

async fn model_status_handler(
    State(state): State<Arc<DashboardState>>,
) -> DashboardResult<Json<ModelStatusResponse>> {
    let model = state.load_model()?;
    let sha256 = state.store.fingerprint()?;

    Ok(Json(ModelStatusResponse {
        path: state.store.path().display().to_string(),
        sha256,
        metadata: model.metadata(),
    }))
}

async fn preview_handler(
    State(state): State<Arc<DashboardState>>,
    multipart: Multipart,
) -> DashboardResult<Json<UploadPreview>> {
    let upload = read_upload(&state, multipart).await?;
    let preview = UploadPreview::from_csv_reader(upload.as_slice(), state.preview_rows)?;
    Ok(Json(preview))
}

async fn explain_handler(
    State(state): State<Arc<DashboardState>>,
    multipart: Multipart,
) -> DashboardResult<Json<ExplainResponse>> {
    let upload = read_upload(&state, multipart).await?;
    let run = state.explain_upload(&upload)?;

    Ok(Json(ExplainResponse {
        run_id: run.run_id.to_string(),
        row_count: run.table.len(),
        feature_names: run.table.feature_names,
        zero_filled_features: run.table.zero_filled_features,
        records: run.table.records,
    }))
}

async fn download_handler(
    State(state): State<Arc<DashboardState>>,
    multipart: Multipart,
) -> DashboardResult<(StatusCode, HeaderMap, String)> {
    let upload = read_upload(&state, multipart).await?;
    let run = state.explain_upload(&upload)?;
    let body = explanations_to_csv(&run.table.records)?;

    let disposition = format!("attachment; filename=\"{}\"", state.export_file_name);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| DashboardError::Internal(format!("invalid export file name: {}", e)))?,
    );

    state.metrics.increment_exports_served();
    let run_id = run.run_id.to_string();
    let bytes = body.len().to_string();
    log_event_with_fields(
        Event::ExportWritten,
        &[("run_id", run_id.as_str()), ("bytes", bytes.as_str())],
    );

    Ok((StatusCode::OK, headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, FittedModel, TreeNode};

    #[test]
    fn test_model_status_flattens_metadata() {
        let model = FittedModel::decision_tree(
            vec!["a".to_string()],
            DecisionTree::new(vec![TreeNode::Leaf { value: 1.0 }]),
        );
        let response = ModelStatusResponse {
            path: "model.json".to_string(),
            sha256: "00".to_string(),
            metadata: model.metadata(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "decision_tree");
        assert_eq!(json["tree_count"], 1);
        assert_eq!(json["feature_names"][0], "a");
    }
}
