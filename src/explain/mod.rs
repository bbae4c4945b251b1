//! Explanation engine
//!
//! Given a fitted tree model and an issuer upload, produces per-row
//! predictions, additive per-feature contributions, per-issuer score trends
//! and a ranked plain-text rationale.
//!
//! # Stages
//!
//! 1. `align`: upload columns → dense matrix in fit order (missing → 0)
//! 2. `decompose`: decision-path attribution, `prediction = bias + Σ contributions`
//! 3. `trend`: trailing rolling means per issuer, chronological
//! 4. `rationale`: top contributors, sentiment notes, trend line

pub mod align;
pub mod decompose;
mod engine;
mod errors;
pub mod rationale;
mod settings;
pub mod trend;
mod types;

pub use align::{align_features, align_to_model, AlignedMatrix};
pub use decompose::{decompose, decompose_ensemble, Decomposition};
pub use engine::{explain_dataset, ExplanationEngine};
pub use errors::{ExplainError, ExplainResult};
pub use rationale::{compose_rationale, top_contributors};
pub use settings::ExplainSettings;
pub use trend::{aggregate_trends, rolling_mean, Trend};
pub use types::{ExplanationRecord, ExplanationTable};
