//! Axis-aligned regression trees
//!
//! Trees are stored as a flat node table in the order the fitting library
//! emits them: node 0 is the root and every child index is strictly greater
//! than its parent's, which makes the table acyclic by construction.
//!
//! A split sends a row left when `row[feature] <= threshold`.

use serde::{Deserialize, Serialize};

/// Index of a node inside a tree's node table
pub type NodeId = usize;

/// Capabilities the contribution decomposer needs from a tree regressor.
///
/// Any tree layout can be explained once it answers these questions; the
/// decomposer never looks at a concrete node representation.
pub trait TreeRegressor {
    /// Root node of the tree
    fn root(&self) -> NodeId {
        0
    }

    /// Feature index tested at `node`, or `None` when `node` is a leaf
    fn split_feature(&self, node: NodeId) -> Option<usize>;

    /// Split threshold at `node`, or `None` when `node` is a leaf
    fn threshold(&self, node: NodeId) -> Option<f64>;

    /// Child taken when the tested value is `<= threshold`
    fn left_child(&self, node: NodeId) -> Option<NodeId>;

    /// Child taken when the tested value is `> threshold`
    fn right_child(&self, node: NodeId) -> Option<NodeId>;

    /// Mean target value of the training samples that reached `node`
    fn value_estimate(&self, node: NodeId) -> f64;

    /// Node reached from `node` by `row`, or `None` at a leaf
    fn next_node(&self, node: NodeId, row: &[f64]) -> Option<NodeId> {
        let feature = self.split_feature(node)?;
        let threshold = self.threshold(node)?;
        let value = *row.get(feature)?;
        if value <= threshold {
            self.left_child(node)
        } else {
            self.right_child(node)
        }
    }

    /// Nodes visited by `row`, root first, leaf last
    fn decision_path(&self, row: &[f64]) -> Vec<NodeId> {
        let mut node = self.root();
        let mut path = vec![node];
        while let Some(next) = self.next_node(node, row) {
            path.push(next);
            node = next;
        }
        path
    }

    /// Point prediction for `row`: the value of the leaf it lands in
    fn predict_row(&self, row: &[f64]) -> f64 {
        let path = self.decision_path(row);
        let leaf = path.last().copied().unwrap_or_else(|| self.root());
        self.value_estimate(leaf)
    }
}

/// One node of a serialized tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node testing one feature
    Split {
        feature: usize,
        threshold: f64,
        left: NodeId,
        right: NodeId,
        value: f64,
    },
    /// Terminal node
    Leaf { value: f64 },
}

impl TreeNode {
    /// Value estimate carried by this node
    pub fn value(&self) -> f64 {
        match self {
            TreeNode::Split { value, .. } | TreeNode::Leaf { value } => *value,
        }
    }

    /// True for terminal nodes
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// A single fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Create a tree from its node table
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path, counted in splits
    pub fn depth(&self) -> usize {
        // Children always follow their parent, so one forward pass suffices.
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (id, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                let child_depth = depths[id] + 1;
                for child in [*left, *right] {
                    if let Some(d) = depths.get_mut(child) {
                        *d = child_depth;
                    }
                }
                max_depth = max_depth.max(child_depth);
            }
        }
        max_depth
    }

    /// Largest feature index any split tests
    pub fn max_feature_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                TreeNode::Split { feature, .. } => Some(*feature),
                TreeNode::Leaf { .. } => None,
            })
            .max()
    }

    /// Check structural soundness.
    ///
    /// `n_features` bounds split feature indices when the feature space is
    /// known.
    pub fn validate(&self, n_features: Option<usize>) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (id, node) in self.nodes.iter().enumerate() {
            if !node.value().is_finite() {
                return Err(format!("node {} has a non-finite value", id));
            }

            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = node
            {
                if !threshold.is_finite() {
                    return Err(format!("node {} has a non-finite threshold", id));
                }
                for child in [*left, *right] {
                    if child <= id || child >= self.nodes.len() {
                        return Err(format!(
                            "node {} points to invalid child {} (tree has {} nodes)",
                            id,
                            child,
                            self.nodes.len()
                        ));
                    }
                }
                if left == right {
                    return Err(format!("node {} has identical children", id));
                }
                if let Some(n) = n_features {
                    if *feature >= n {
                        return Err(format!(
                            "node {} splits on feature {} but the model has {} features",
                            id, feature, n
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

impl TreeRegressor for DecisionTree {
    fn split_feature(&self, node: NodeId) -> Option<usize> {
        match self.nodes.get(node)? {
            TreeNode::Split { feature, .. } => Some(*feature),
            TreeNode::Leaf { .. } => None,
        }
    }

    fn threshold(&self, node: NodeId) -> Option<f64> {
        match self.nodes.get(node)? {
            TreeNode::Split { threshold, .. } => Some(*threshold),
            TreeNode::Leaf { .. } => None,
        }
    }

    fn left_child(&self, node: NodeId) -> Option<NodeId> {
        match self.nodes.get(node)? {
            TreeNode::Split { left, .. } => Some(*left),
            TreeNode::Leaf { .. } => None,
        }
    }

    fn right_child(&self, node: NodeId) -> Option<NodeId> {
        match self.nodes.get(node)? {
            TreeNode::Split { right, .. } => Some(*right),
            TreeNode::Leaf { .. } => None,
        }
    }

    fn value_estimate(&self, node: NodeId) -> f64 {
        self.nodes.get(node).map(TreeNode::value).unwrap_or(0.0)
    }
}
