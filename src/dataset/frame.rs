//! Parsed issuer upload
//!
//! The upload is turned into an explicit schema up front: reserved columns
//! become typed fields of `IssuerRecord`, every other column is a candidate
//! feature holding an optional number per row.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{DatasetError, DatasetResult};

/// Column holding the issuer identifier
pub const ISSUER_ID_COLUMN: &str = "issuer_id";
/// Column holding the observation timestamp
pub const LAST_UPDATED_COLUMN: &str = "last_updated";
/// Training target; never used as a feature
pub const TARGET_COLUMN: &str = "creditworthiness_score";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Identifier of a scored issuer.
///
/// Integer-looking ids order numerically and sort before free-form labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssuerId {
    Numeric(i64),
    Label(String),
}

impl IssuerId {
    /// Interpret a CSV cell
    pub fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        Some(match cell.parse::<i64>() {
            Ok(n) => IssuerId::Numeric(n),
            Err(_) => IssuerId::Label(cell.to_string()),
        })
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssuerId::Numeric(n) => write!(f, "{}", n),
            IssuerId::Label(s) => write!(f, "{}", s),
        }
    }
}

/// Parse a `last_updated` cell. Naive values are taken as UTC.
pub fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let cell = cell.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One uploaded row
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerRecord {
    pub issuer_id: Option<IssuerId>,
    pub last_updated: Option<DateTime<Utc>>,
    /// One entry per frame feature column; `None` for empty or non-numeric cells
    pub values: Vec<Option<f64>>,
}

/// A parsed upload: ordered feature columns plus one record per data row
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerFrame {
    feature_columns: Vec<String>,
    records: Vec<IssuerRecord>,
}

impl IssuerFrame {
    /// Parse a CSV upload
    pub fn from_csv_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(DatasetError::EmptyUpload);
        }

        let mut seen = HashSet::new();
        for name in headers.iter() {
            if !seen.insert(name) {
                return Err(DatasetError::DuplicateColumn(name.to_string()));
            }
        }

        let issuer_idx = headers.iter().position(|h| h == ISSUER_ID_COLUMN);
        let updated_idx = headers.iter().position(|h| h == LAST_UPDATED_COLUMN);

        let feature_idx: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !matches!(*h, ISSUER_ID_COLUMN | LAST_UPDATED_COLUMN | TARGET_COLUMN))
            .map(|(i, _)| i)
            .collect();

        if feature_idx.is_empty() {
            return Err(DatasetError::NoFeatureColumns);
        }

        let feature_columns = feature_idx
            .iter()
            .map(|&i| headers[i].to_string())
            .collect();

        let mut records = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result?;

            let issuer_id = match issuer_idx {
                Some(idx) => Some(
                    IssuerId::parse(&record[idx]).ok_or(DatasetError::InvalidIssuerId { row })?,
                ),
                None => None,
            };

            let last_updated = match updated_idx {
                Some(idx) => {
                    let cell = &record[idx];
                    Some(parse_timestamp(cell).ok_or_else(|| DatasetError::InvalidTimestamp {
                        row,
                        value: cell.to_string(),
                    })?)
                }
                None => None,
            };

            let values = feature_idx.iter().map(|&idx| parse_number(&record[idx])).collect();

            records.push(IssuerRecord {
                issuer_id,
                last_updated,
                values,
            });
        }

        Ok(Self {
            feature_columns,
            records,
        })
    }

    /// Parse a CSV upload held in memory
    pub fn from_csv_bytes(bytes: &[u8]) -> DatasetResult<Self> {
        Self::from_csv_reader(bytes)
    }

    /// Candidate feature columns, in upload order
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Position of a feature column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.feature_columns.iter().position(|c| c == name)
    }

    /// Parsed rows, in upload order
    pub fn records(&self) -> &[IssuerRecord] {
        &self.records
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the upload has a header but no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Numeric value of `column` in row `row`
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.records.get(row)?.values.get(idx).copied().flatten()
    }
}

/// The first rows of an upload exactly as sent, for display before scoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl UploadPreview {
    /// Read the header and the first `limit` rows
    pub fn from_csv_reader<R: Read>(reader: R, limit: usize) -> DatasetResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(DatasetError::EmptyUpload);
        }

        let mut rows = Vec::new();
        let mut total_rows = 0;
        for result in rdr.records() {
            let record = result?;
            if rows.len() < limit {
                rows.push(record.iter().map(str::to_string).collect());
            }
            total_rows += 1;
        }

        Ok(Self {
            columns,
            rows,
            total_rows,
        })
    }
}
