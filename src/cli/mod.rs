//! CLI module for credscope
//!
//! Provides command-line interface for:
//! - serve: Run the scoring dashboard over HTTP
//! - explain: One-shot explanation of a CSV file
//! - inspect-model: Show the installed model
//! - save-model: Validate and install a fitted model

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, inspect_model, run, run_command, save_model, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_table};
