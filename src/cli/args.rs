//! CLI argument definitions using clap
//!
//! Commands:
//! - credscope serve [--config <path>] [--port <u16>]
//! - credscope explain [--config <path>] --input <csv> [--output <csv>]
//! - credscope inspect-model [--config <path>]
//! - credscope save-model [--config <path>] --from <json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// credscope - Explainable credit scoring dashboard
#[derive(Parser, Debug)]
#[command(name = "credscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the scoring dashboard HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the configuration)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Score and explain a CSV of issuer rows
    Explain {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Issuer CSV to explain
        #[arg(long)]
        input: PathBuf,

        /// Where to write the explanation CSV (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print metadata of the installed model
    InspectModel {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a fitted model document and install it
    SaveModel {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Model JSON document to install
        #[arg(long)]
        from: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
