//! Explanation output types

use serde::{Deserialize, Serialize};

use crate::dataset::IssuerId;

/// One explained row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRecord {
    pub issuer_id: IssuerId,
    pub predicted_score: f64,
    pub short_term_trend: f64,
    pub long_term_trend: f64,
    pub explanation: String,
}

/// Result of one explanation run, rows in `(issuer_id, last_updated)` order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationTable {
    /// Fit-order features the model scored with
    pub feature_names: Vec<String>,
    /// Required features absent from the upload, scored as zero
    pub zero_filled_features: Vec<String>,
    pub records: Vec<ExplanationRecord>,
}

impl ExplanationTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
