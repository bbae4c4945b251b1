//! Per-issuer score trends
//!
//! Rows are stable-sorted by `(issuer_id, last_updated)`; within each issuer
//! the short- and long-term trends are trailing rolling means of the
//! predicted score. A window never reaches past the current row and shrinks
//! at the start of a group.

use chrono::{DateTime, Utc};

use crate::dataset::IssuerId;

/// One scored row, as seen by the trend aggregator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    pub issuer_id: &'a IssuerId,
    pub last_updated: DateTime<Utc>,
    pub score: f64,
}

/// Rolling means for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub short_term: f64,
    pub long_term: f64,
}

/// A trend tagged with the input position it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedTrend {
    pub index: usize,
    pub trend: Trend,
}

/// Indices of `observations` in `(issuer_id, last_updated)` order.
///
/// The sort is stable: rows with equal keys keep their input order.
pub fn chronological_order(observations: &[Observation<'_>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..observations.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&observations[a], &observations[b]);
        a.issuer_id
            .cmp(b.issuer_id)
            .then_with(|| a.last_updated.cmp(&b.last_updated))
    });
    order
}

/// Trailing mean of up to `window` values ending at each position
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|end| {
            let start = (end + 1).saturating_sub(window);
            let slice = &values[start..=end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Compute trends for every observation.
///
/// The result is in chronological order (see `chronological_order`), each
/// entry naming the input row it belongs to.
pub fn aggregate_trends(
    observations: &[Observation<'_>],
    short_window: usize,
    long_window: usize,
) -> Vec<OrderedTrend> {
    let order = chronological_order(observations);
    let mut result = Vec::with_capacity(order.len());

    for group in order.chunk_by(|&a, &b| observations[a].issuer_id == observations[b].issuer_id) {
        let scores: Vec<f64> = group.iter().map(|&i| observations[i].score).collect();
        let short = rolling_mean(&scores, short_window);
        let long = rolling_mean(&scores, long_window);

        for (pos, &index) in group.iter().enumerate() {
            result.push(OrderedTrend {
                index,
                trend: Trend {
                    short_term: short[pos],
                    long_term: long[pos],
                },
            });
        }
    }

    result
}
