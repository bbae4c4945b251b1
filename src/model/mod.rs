//! Fitted regression models
//!
//! - `tree`: the `TreeRegressor` capability trait and the concrete tree layout
//! - `estimator`: the model document (single tree, bagged forest, linear)
//! - `store`: load/save at the configured path

mod errors;
mod estimator;
mod store;
pub mod tree;

pub use errors::{ModelError, ModelResult};
pub use estimator::{Estimator, FittedModel, ModelMetadata, MODEL_FORMAT_VERSION};
pub use store::ModelStore;
pub use tree::{DecisionTree, NodeId, TreeNode, TreeRegressor};
