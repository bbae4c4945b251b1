//! Feature alignment
//!
//! Lays the upload out as a dense matrix in the exact column order the model
//! was fit with. Required features the upload lacks become all-zero columns;
//! upload columns the model never saw are left out of the matrix.

use crate::dataset::IssuerFrame;
use crate::model::FittedModel;

use super::errors::{ExplainError, ExplainResult};

/// Feature matrix in fit order, one row per upload row
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMatrix {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    zero_filled: Vec<String>,
}

impl AlignedMatrix {
    /// Fit-order feature names (the matrix columns)
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Matrix rows, in upload order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Required features that were missing from the upload and zero-filled
    pub fn zero_filled(&self) -> &[String] {
        &self.zero_filled
    }

    /// Value of feature `name` in row `row`
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let idx = self.feature_names.iter().position(|n| n == name)?;
        self.rows.get(row)?.get(idx).copied()
    }

    /// All values of feature `name`
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.feature_names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}

/// Align `frame` to the ordered `required` feature list
pub fn align_features(
    frame: &IssuerFrame,
    required: &[String],
) -> ExplainResult<AlignedMatrix> {
    let sources: Vec<Option<usize>> = required
        .iter()
        .map(|name| frame.column_index(name))
        .collect();

    let zero_filled = required
        .iter()
        .zip(&sources)
        .filter(|(_, source)| source.is_none())
        .map(|(name, _)| name.clone())
        .collect();

    let mut rows = Vec::with_capacity(frame.len());
    for (i, record) in frame.records().iter().enumerate() {
        let mut row = Vec::with_capacity(required.len());
        for (name, source) in required.iter().zip(&sources) {
            let value = match source {
                None => 0.0,
                Some(idx) => record.values.get(*idx).copied().flatten().ok_or_else(|| {
                    ExplainError::InvalidFeatureValue {
                        column: name.clone(),
                        row: i + 1,
                    }
                })?,
            };
            row.push(value);
        }
        rows.push(row);
    }

    Ok(AlignedMatrix {
        feature_names: required.to_vec(),
        rows,
        zero_filled,
    })
}

/// Align `frame` to the feature list recorded in `model`.
///
/// Fails with `ModelIncompatible` when the model has no such list.
pub fn align_to_model(frame: &IssuerFrame, model: &FittedModel) -> ExplainResult<AlignedMatrix> {
    let required = model.feature_names()?;
    align_features(frame, required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, ModelError, TreeNode};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reorders_and_drops_extras() {
        let frame = IssuerFrame::from_csv_bytes(b"c,a,extra,b\n3,1,9,2\n30,10,90,20\n").unwrap();
        let matrix = align_features(&frame, &names(&["a", "b", "c"])).unwrap();

        assert_eq!(matrix.rows(), &[vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]]);
        assert!(matrix.zero_filled().is_empty());
        assert_eq!(matrix.value(1, "extra"), None);
    }

    #[test]
    fn test_missing_feature_is_zero_filled() {
        let frame = IssuerFrame::from_csv_bytes(b"a\n1\n2\n").unwrap();
        let matrix = align_features(&frame, &names(&["a", "x"])).unwrap();

        assert_eq!(matrix.column("x"), Some(vec![0.0, 0.0]));
        assert_eq!(matrix.zero_filled(), &["x".to_string()]);
    }

    #[test]
    fn test_non_numeric_required_cell_fails() {
        let frame = IssuerFrame::from_csv_bytes(b"a,b\n1,2\n3,n/a\n").unwrap();
        let err = align_features(&frame, &names(&["a", "b"])).unwrap_err();
        assert_eq!(
            err,
            ExplainError::InvalidFeatureValue {
                column: "b".to_string(),
                row: 2
            }
        );
    }

    #[test]
    fn test_non_numeric_extra_column_is_ignored() {
        let frame = IssuerFrame::from_csv_bytes(b"a,sector\n1,energy\n").unwrap();
        assert!(align_features(&frame, &names(&["a"])).is_ok());
    }

    #[test]
    fn test_model_without_feature_names_is_incompatible() {
        let frame = IssuerFrame::from_csv_bytes(b"a\n1\n").unwrap();
        let mut model = FittedModel::decision_tree(
            names(&["a"]),
            DecisionTree::new(vec![TreeNode::Leaf { value: 1.0 }]),
        );
        model.feature_names = None;

        assert!(matches!(
            align_to_model(&frame, &model),
            Err(ExplainError::Model(ModelError::Incompatible(_)))
        ));
    }
}
