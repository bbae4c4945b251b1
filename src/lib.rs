//! credscope - Explainable credit scoring
//!
//! Scores issuer rows with a fitted tree regressor, splits every
//! prediction into a bias plus per-feature contributions, adds per-issuer
//! rolling trends, and writes a short rationale for each row.
//!
//! - [`model`]: fitted model documents and the on-disk store
//! - [`dataset`]: issuer CSV parsing and explanation export
//! - [`explain`]: alignment, decomposition, trends and rationales
//! - [`http_server`]: the dashboard HTTP API
//! - [`cli`]: command-line entry points
//! - [`observability`]: structured logging and counters

pub mod cli;
pub mod dataset;
pub mod explain;
pub mod http_server;
pub mod model;
pub mod observability;
