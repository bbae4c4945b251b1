//! Explanation export
//!
//! Writes the explanation table as CSV with the columns
//! `issuer_id, predicted_score, short_term_trend, long_term_trend, explanation`.

use std::io::Write;

use super::errors::DatasetResult;
use crate::explain::ExplanationRecord;

/// File name offered for the explanation download
pub const DEFAULT_EXPORT_FILE_NAME: &str = "credit_score_explanations.csv";

/// Write `records` as CSV to `writer`
pub fn write_explanations_csv<W: Write>(
    records: &[ExplanationRecord],
    writer: W,
) -> DatasetResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    // Header is written explicitly so an empty table still has one.
    wtr.write_record([
        "issuer_id",
        "predicted_score",
        "short_term_trend",
        "long_term_trend",
        "explanation",
    ])?;

    for record in records {
        wtr.write_record(&[
            record.issuer_id.to_string(),
            format_score(record.predicted_score),
            format_score(record.short_term_trend),
            format_score(record.long_term_trend),
            record.explanation.clone(),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Shortest round-trip form that always keeps a decimal point (`700.0`)
fn format_score(value: f64) -> String {
    format!("{:?}", value)
}

/// Render `records` as an in-memory CSV document
pub fn explanations_to_csv(records: &[ExplanationRecord]) -> DatasetResult<String> {
    let mut buffer = Vec::new();
    write_explanations_csv(records, &mut buffer)?;
    // csv output of valid UTF-8 strings is valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
