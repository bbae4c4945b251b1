//! Explanation engine
//!
//! align → decompose → trend → rationale, in one synchronous pass. The engine
//! borrows the model and the upload and returns a freshly owned table; it
//! keeps nothing between runs.

use chrono::{DateTime, Utc};

use crate::dataset::{IssuerFrame, IssuerId};
use crate::model::FittedModel;

use super::align::align_to_model;
use super::decompose::decompose;
use super::errors::ExplainResult;
use super::rationale::{compose_rationale, RationaleInput, NEWS_NEG_RATIO, NEWS_POS_RATIO};
use super::settings::ExplainSettings;
use super::trend::{aggregate_trends, Observation};
use super::types::{ExplanationRecord, ExplanationTable};

/// Explains uploads against one fitted model
#[derive(Debug, Clone)]
pub struct ExplanationEngine<'m> {
    model: &'m FittedModel,
    settings: ExplainSettings,
}

impl<'m> ExplanationEngine<'m> {
    /// Engine with default settings
    pub fn new(model: &'m FittedModel) -> Self {
        Self {
            model,
            settings: ExplainSettings::default(),
        }
    }

    /// Engine with custom settings
    pub fn with_settings(model: &'m FittedModel, settings: ExplainSettings) -> ExplainResult<Self> {
        settings.validate()?;
        Ok(Self { model, settings })
    }

    pub fn settings(&self) -> &ExplainSettings {
        &self.settings
    }

    /// Explain `frame`, stamping rows without `last_updated` with the current time
    pub fn explain(&self, frame: &IssuerFrame) -> ExplainResult<ExplanationTable> {
        self.explain_at(frame, Utc::now())
    }

    /// Explain `frame`, stamping rows without `last_updated` with `now`
    pub fn explain_at(
        &self,
        frame: &IssuerFrame,
        now: DateTime<Utc>,
    ) -> ExplainResult<ExplanationTable> {
        let matrix = align_to_model(frame, self.model)?;
        let decomposition = decompose(self.model, &matrix)?;

        let issuer_ids: Vec<IssuerId> = frame
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| r.issuer_id.clone().unwrap_or(IssuerId::Numeric(i as i64)))
            .collect();

        let observations: Vec<Observation<'_>> = frame
            .records()
            .iter()
            .zip(&issuer_ids)
            .zip(&decomposition.predictions)
            .map(|((record, issuer_id), &score)| Observation {
                issuer_id,
                last_updated: record.last_updated.unwrap_or(now),
                score,
            })
            .collect();

        let trends = aggregate_trends(
            &observations,
            self.settings.short_term_window,
            self.settings.long_term_window,
        );

        let records = trends
            .into_iter()
            .map(|ordered| {
                let row = ordered.index;
                let news_ratio =
                    |name: &str| matrix.value(row, name).or_else(|| frame.value(row, name));

                let input = RationaleInput {
                    feature_names: matrix.feature_names(),
                    values: &matrix.rows()[row],
                    contributions: &decomposition.contributions[row],
                    trend: ordered.trend,
                    news_pos_ratio: news_ratio(NEWS_POS_RATIO),
                    news_neg_ratio: news_ratio(NEWS_NEG_RATIO),
                };

                ExplanationRecord {
                    issuer_id: issuer_ids[row].clone(),
                    predicted_score: decomposition.predictions[row],
                    short_term_trend: ordered.trend.short_term,
                    long_term_trend: ordered.trend.long_term,
                    explanation: compose_rationale(
                        &input,
                        self.settings.top_features,
                        self.settings.sentiment_threshold,
                    ),
                }
            })
            .collect();

        Ok(ExplanationTable {
            feature_names: matrix.feature_names().to_vec(),
            zero_filled_features: matrix.zero_filled().to_vec(),
            records,
        })
    }
}

/// Explain `frame` with default settings
pub fn explain_dataset(
    model: &FittedModel,
    frame: &IssuerFrame,
) -> ExplainResult<ExplanationTable> {
    ExplanationEngine::new(model).explain(frame)
}
