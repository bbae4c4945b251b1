//! Fitted model document
//!
//! A model file is a JSON document:
//!
//! ```text
//! {
//!   "format_version": 1,
//!   "feature_names": ["debt_to_equity", ...] | null,
//!   "estimator": { "type": "decision_tree" | "random_forest" | "linear", ... }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::{ModelError, ModelResult};
use super::tree::{DecisionTree, TreeRegressor};

/// Current model document version
pub const MODEL_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    MODEL_FORMAT_VERSION
}

/// The fitted estimator inside a model document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    /// A single regression tree
    DecisionTree(DecisionTree),
    /// Bagged trees whose outputs are averaged
    RandomForest { trees: Vec<DecisionTree> },
    /// Ordinary linear regression. Predicts, but has no decision paths.
    Linear { intercept: f64, coefficients: Vec<f64> },
}

impl Estimator {
    /// Short name used in metadata and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest { .. } => "random_forest",
            Estimator::Linear { .. } => "linear",
        }
    }
}

/// A previously fitted regression model plus its fit-time metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    /// Ordered feature names seen at fit time
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    pub estimator: Estimator,
}

/// Summary of a model, as reported to the dashboard and CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetadata {
    pub kind: String,
    pub feature_names: Option<Vec<String>>,
    pub tree_count: usize,
    pub node_count: usize,
    pub max_depth: usize,
    pub decomposable: bool,
}

impl FittedModel {
    /// Wrap a single tree
    pub fn decision_tree(feature_names: Vec<String>, tree: DecisionTree) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            feature_names: Some(feature_names),
            estimator: Estimator::DecisionTree(tree),
        }
    }

    /// Wrap a bagged forest
    pub fn random_forest(feature_names: Vec<String>, trees: Vec<DecisionTree>) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            feature_names: Some(feature_names),
            estimator: Estimator::RandomForest { trees },
        }
    }

    /// Wrap a linear model
    pub fn linear(feature_names: Vec<String>, intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            feature_names: Some(feature_names),
            estimator: Estimator::Linear {
                intercept,
                coefficients,
            },
        }
    }

    /// Parse and validate a model document
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let model: FittedModel = serde_json::from_str(json)
            .map_err(|e| ModelError::Malformed(format!("invalid model JSON: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize to the on-disk document form
    pub fn to_json(&self) -> ModelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ModelError::Malformed(format!("cannot serialize model: {}", e)))
    }

    /// Check the document for structural problems.
    ///
    /// A missing feature-name list is allowed here; it only blocks
    /// explanation, which needs the fit-time column order.
    pub fn validate(&self) -> ModelResult<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(ModelError::Malformed(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }

        let n_features = self.feature_names.as_ref().map(Vec::len);

        if let Some(names) = &self.feature_names {
            let mut seen = HashSet::new();
            for name in names {
                if name.trim().is_empty() {
                    return Err(ModelError::Malformed("empty feature name".to_string()));
                }
                if !seen.insert(name.as_str()) {
                    return Err(ModelError::Malformed(format!(
                        "duplicate feature name '{}'",
                        name
                    )));
                }
            }
        }

        match &self.estimator {
            Estimator::DecisionTree(tree) => {
                tree.validate(n_features).map_err(ModelError::Malformed)
            }
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Malformed("random forest has no trees".to_string()));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n_features)
                        .map_err(|e| ModelError::Malformed(format!("tree {}: {}", i, e)))?;
                }
                Ok(())
            }
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::Malformed(
                        "linear model has non-finite parameters".to_string(),
                    ));
                }
                if let Some(n) = n_features {
                    if coefficients.len() != n {
                        return Err(ModelError::Malformed(format!(
                            "linear model has {} coefficients for {} features",
                            coefficients.len(),
                            n
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Fit-time feature names, in fit order
    pub fn feature_names(&self) -> ModelResult<&[String]> {
        self.feature_names.as_deref().ok_or_else(|| {
            ModelError::Incompatible(
                "model does not record the feature names it was fit with".to_string(),
            )
        })
    }

    /// Trees whose averaged decision paths explain the prediction
    pub fn tree_ensemble(&self) -> ModelResult<&[DecisionTree]> {
        match &self.estimator {
            Estimator::DecisionTree(tree) => Ok(std::slice::from_ref(tree)),
            Estimator::RandomForest { trees } => Ok(trees.as_slice()),
            Estimator::Linear { .. } => Err(ModelError::UnsupportedModelType(
                self.estimator.kind().to_string(),
            )),
        }
    }

    /// Point prediction for a row laid out in fit order
    pub fn predict(&self, row: &[f64]) -> f64 {
        match &self.estimator {
            Estimator::DecisionTree(tree) => tree.predict_row(row),
            Estimator::RandomForest { trees } => {
                let total: f64 = trees.iter().map(|t| t.predict_row(row)).sum();
                total / trees.len().max(1) as f64
            }
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(row)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
        }
    }

    /// Summarize the model
    pub fn metadata(&self) -> ModelMetadata {
        let trees = self.tree_ensemble().unwrap_or(&[]);
        ModelMetadata {
            kind: self.estimator.kind().to_string(),
            feature_names: self.feature_names.clone(),
            tree_count: trees.len(),
            node_count: trees.iter().map(DecisionTree::node_count).sum(),
            max_depth: trees.iter().map(DecisionTree::depth).max().unwrap_or(0),
            decomposable: !trees.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::TreeNode;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> DecisionTree {
        DecisionTree::new(vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
                value: (low + high) / 2.0,
            },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ])
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_forest_prediction_is_tree_mean() {
        let model = FittedModel::random_forest(
            names(&["a", "b"]),
            vec![stump(0, 1.0, 0.0, 10.0), stump(1, 1.0, 2.0, 4.0)],
        );
        assert_eq!(model.predict(&[2.0, 0.0]), 6.0);
        assert_eq!(model.predict(&[0.0, 2.0]), 2.0);
    }

    #[test]
    fn test_linear_predicts_but_is_not_decomposable() {
        let model = FittedModel::linear(names(&["a", "b"]), 1.0, vec![2.0, -1.0]);
        assert_eq!(model.predict(&[3.0, 4.0]), 3.0);
        assert!(matches!(
            model.tree_ensemble(),
            Err(ModelError::UnsupportedModelType(_))
        ));
        assert!(!model.metadata().decomposable);
    }

    #[test]
    fn test_missing_feature_names_is_incompatible() {
        let mut model = FittedModel::decision_tree(names(&["a"]), stump(0, 1.0, 0.0, 1.0));
        model.feature_names = None;
        assert!(model.validate().is_ok());
        assert!(matches!(model.feature_names(), Err(ModelError::Incompatible(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let model = FittedModel::decision_tree(names(&["a", "a"]), stump(0, 1.0, 0.0, 1.0));
        assert!(matches!(model.validate(), Err(ModelError::Malformed(_))));
    }

    #[test]
    fn test_validate_rejects_empty_forest() {
        let model = FittedModel::random_forest(names(&["a"]), vec![]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_document() {
        let model = FittedModel::decision_tree(names(&["a", "b"]), stump(1, 0.5, -1.0, 1.0));
        let json = model.to_json().unwrap();
        assert!(json.contains("\"type\": \"decision_tree\""));
        assert_eq!(FittedModel::from_json(&json).unwrap(), model);
    }

    #[test]
    fn test_document_without_version_defaults() {
        let json = r#"{
            "feature_names": ["x"],
            "estimator": {"type": "decision_tree", "nodes": [{"kind": "leaf", "value": 2.0}]}
        }"#;
        let model = FittedModel::from_json(json).unwrap();
        assert_eq!(model.format_version, MODEL_FORMAT_VERSION);
        assert_eq!(model.predict(&[0.0]), 2.0);
    }

    #[test]
    fn test_metadata_counts() {
        let model = FittedModel::random_forest(
            names(&["a", "b"]),
            vec![stump(0, 1.0, 0.0, 10.0), stump(1, 1.0, 2.0, 4.0)],
        );
        let meta = model.metadata();
        assert_eq!(meta.kind, "random_forest");
        assert_eq!(meta.tree_count, 2);
        assert_eq!(meta.node_count, 6);
        assert_eq!(meta.max_depth, 1);
    }
}
