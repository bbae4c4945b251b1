//! # Dashboard HTTP Server
//!
//! The scoring dashboard as an HTTP API: upload issuer CSVs, get back
//! scored and explained rows as JSON or as a CSV download.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/model` - Installed model metadata
//! - `/upload/preview` - Preview an upload
//! - `/explain`, `/explain/download` - Score and explain an upload
//! - `/observability/*` - Health and counters

pub mod config;
pub mod errors;
pub mod explain_routes;
pub mod observability_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{DashboardError, DashboardResult, NO_MODEL_MESSAGE};
pub use server::HttpServer;
pub use state::{DashboardState, ExplanationRun};
