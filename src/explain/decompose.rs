//! Decision-path contribution decomposition
//!
//! For a single tree the prediction for a row is the value of the leaf the
//! row lands in. Walking the path from the root, every split moves the
//! running estimate from `value(parent)` to `value(child)`; that delta is
//! credited to the feature the split tested. Hence
//!
//! ```text
//! prediction = value(root) + Σ_features contribution[feature]
//! ```
//!
//! holds exactly, with `value(root)` as the bias. An ensemble averages
//! predictions, biases and contributions over its trees, so the identity
//! survives averaging.

use crate::model::{FittedModel, TreeRegressor};

use super::align::AlignedMatrix;
use super::errors::ExplainResult;

/// Attribution of one tree's prediction for one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathAttribution {
    pub bias: f64,
    pub prediction: f64,
}

/// Per-row predictions, biases and per-feature contributions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decomposition {
    pub predictions: Vec<f64>,
    pub biases: Vec<f64>,
    /// `contributions[row][feature]`, features in fit order
    pub contributions: Vec<Vec<f64>>,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// `bias + Σ contributions` for `row`
    pub fn reconstructed(&self, row: usize) -> f64 {
        self.biases[row] + self.contributions[row].iter().sum::<f64>()
    }
}

/// Walk `row` down `tree`, adding each split's delta into `contributions`
pub fn attribute_path<T: TreeRegressor + ?Sized>(
    tree: &T,
    row: &[f64],
    contributions: &mut [f64],
) -> PathAttribution {
    let root = tree.root();
    let bias = tree.value_estimate(root);

    let mut node = root;
    let mut current = bias;
    while let Some(next) = tree.next_node(node, row) {
        let next_value = tree.value_estimate(next);
        if let Some(slot) = tree.split_feature(node).and_then(|f| contributions.get_mut(f)) {
            *slot += next_value - current;
        }
        current = next_value;
        node = next;
    }

    PathAttribution {
        bias,
        prediction: current,
    }
}

/// Decompose every row of `rows` over an ensemble of `trees`.
///
/// `n_features` is the width of each row. An empty ensemble yields zero
/// predictions, biases and contributions.
pub fn decompose_ensemble<T: TreeRegressor>(
    trees: &[T],
    rows: &[Vec<f64>],
    n_features: usize,
) -> Decomposition {
    let scale = if trees.is_empty() {
        0.0
    } else {
        1.0 / trees.len() as f64
    };

    let mut decomposition = Decomposition {
        predictions: Vec::with_capacity(rows.len()),
        biases: Vec::with_capacity(rows.len()),
        contributions: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        let mut contributions = vec![0.0; n_features];
        let mut bias = 0.0;
        let mut prediction = 0.0;

        for tree in trees {
            let path = attribute_path(tree, row, &mut contributions);
            bias += path.bias;
            prediction += path.prediction;
        }

        contributions.iter_mut().for_each(|c| *c *= scale);
        decomposition.predictions.push(prediction * scale);
        decomposition.biases.push(bias * scale);
        decomposition.contributions.push(contributions);
    }

    decomposition
}

/// Decompose `matrix` with `model`.
///
/// Fails with `UnsupportedModelType` for models without decision paths.
pub fn decompose(model: &FittedModel, matrix: &AlignedMatrix) -> ExplainResult<Decomposition> {
    let trees = model.tree_ensemble()?;
    Ok(decompose_ensemble(
        trees,
        matrix.rows(),
        matrix.feature_names().len(),
    ))
}
