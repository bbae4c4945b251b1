//! Output handling for CLI
//!
//! - Structured results: one JSON object on stdout
//! - Explanation tables: CSV to a file or stdout
//! - UTF-8 only

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::dataset::write_explanations_csv;
use crate::explain::ExplanationRecord;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write explanation rows as CSV to `output`, or stdout when absent
pub fn write_table(records: &[ExplanationRecord], output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_explanations_csv(records, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_explanations_csv(records, &mut lock)?;
            lock.flush()?;
        }
    }

    Ok(())
}
