//! Rationale text
//!
//! ```text
//! Top contributing features:
//! - leverage: value=2.500, contribution=-12.345
//! - interest_coverage: value=4.100, contribution=6.020
//! - news_pos_ratio: value=0.700, contribution=1.500
//! - Positive news sentiment is high, boosting score.
//! - Short-term trend: 612.34, Long-term trend: 605.10
//! ```

use std::fmt::Write;

use super::trend::Trend;

/// Uploaded column carrying the share of positive news
pub const NEWS_POS_RATIO: &str = "news_pos_ratio";
/// Uploaded column carrying the share of negative news
pub const NEWS_NEG_RATIO: &str = "news_neg_ratio";

/// Everything the composer needs for one row
#[derive(Debug, Clone, Copy)]
pub struct RationaleInput<'a> {
    /// Fit-order feature names
    pub feature_names: &'a [String],
    /// Aligned feature values, fit order
    pub values: &'a [f64],
    /// Contributions, fit order
    pub contributions: &'a [f64],
    pub trend: Trend,
    pub news_pos_ratio: Option<f64>,
    pub news_neg_ratio: Option<f64>,
}

/// Indices of the `k` largest contributions by magnitude, largest first.
///
/// Equal magnitudes keep fit order.
pub fn top_contributors(contributions: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..contributions.len()).collect();
    order.sort_by(|&a, &b| contributions[b].abs().total_cmp(&contributions[a].abs()));
    order.truncate(k);
    order
}

/// Render the rationale for one row
pub fn compose_rationale(
    input: &RationaleInput<'_>,
    top_features: usize,
    sentiment_threshold: f64,
) -> String {
    let mut text = String::from("Top contributing features:\n");

    for idx in top_contributors(input.contributions, top_features) {
        let _ = writeln!(
            text,
            "- {}: value={:.3}, contribution={:.3}",
            input.feature_names[idx], input.values[idx], input.contributions[idx]
        );
    }

    if input.news_pos_ratio.is_some_and(|r| r > sentiment_threshold) {
        text.push_str("- Positive news sentiment is high, boosting score.\n");
    }
    if input.news_neg_ratio.is_some_and(|r| r > sentiment_threshold) {
        text.push_str("- Negative news sentiment is high, reducing score.\n");
    }

    let _ = writeln!(
        text,
        "- Short-term trend: {:.2}, Long-term trend: {:.2}",
        input.trend.short_term, input.trend.long_term
    );

    text
}
