//! Model Store Tests
//!
//! The store installs models atomically and reports every unusable file
//! as a missing model rather than a crash.

use std::fs;

use credscope::model::{
    DecisionTree, Estimator, FittedModel, ModelError, ModelStore, TreeNode, TreeRegressor,
};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn sample_model() -> FittedModel {
    FittedModel::decision_tree(
        vec!["debt_to_equity".to_string(), "interest_coverage".to_string()],
        DecisionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.2,
                left: 1,
                right: 4,
                value: 61.0,
            },
            TreeNode::Split {
                feature: 1,
                threshold: 3.0,
                left: 2,
                right: 3,
                value: 68.0,
            },
            TreeNode::Leaf { value: 60.0 },
            TreeNode::Leaf { value: 75.0 },
            TreeNode::Leaf { value: 48.0 },
        ]),
    )
}

// =============================================================================
// Save and Load
// =============================================================================

#[test]
fn test_saved_model_loads_identically() {
    let dir = create_temp_dir();
    let store = ModelStore::new(dir.path().join("nested").join("model.json"));
    let model = sample_model();

    store.save(&model).expect("save succeeds");
    assert!(store.exists());

    let loaded = store.load().expect("load succeeds");
    assert_eq!(loaded, model);
    assert_eq!(loaded.predict(&[1.0, 4.0]), 75.0);
    assert_eq!(loaded.predict(&[2.0, 4.0]), 48.0);
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = create_temp_dir();
    let store = ModelStore::new(dir.path().join("model.json"));
    store.save(&sample_model()).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["model.json".to_string()]);
}

#[test]
fn test_save_replaces_existing_model() {
    let dir = create_temp_dir();
    let store = ModelStore::new(dir.path().join("model.json"));
    store.save(&sample_model()).unwrap();
    let first = store.fingerprint().unwrap();

    let stump = FittedModel::decision_tree(
        vec!["debt_to_equity".to_string()],
        DecisionTree::new(vec![TreeNode::Leaf { value: 55.0 }]),
    );
    store.save(&stump).unwrap();

    assert_ne!(store.fingerprint().unwrap(), first);
    assert_eq!(store.load().unwrap(), stump);
}

#[test]
fn test_invalid_model_is_not_installed() {
    let dir = create_temp_dir();
    let store = ModelStore::new(dir.path().join("model.json"));

    let broken = FittedModel::decision_tree(
        vec!["a".to_string()],
        DecisionTree::new(vec![TreeNode::Split {
            feature: 0,
            threshold: 1.0,
            left: 5,
            right: 6,
            value: 1.0,
        }]),
    );

    assert!(matches!(store.save(&broken), Err(ModelError::Malformed(_))));
    assert!(!store.exists());
}

// =============================================================================
// Missing or Unusable Models
// =============================================================================

#[test]
fn test_absent_file_is_not_found() {
    let dir = create_temp_dir();
    let store = ModelStore::new(dir.path().join("missing.json"));

    let err = store.load().unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    assert!(err.is_missing_model());
}

#[test]
fn test_garbage_file_is_unreadable() {
    let dir = create_temp_dir();
    let path = dir.path().join("model.json");
    fs::write(&path, b"\x00\x01not json").unwrap();

    let err = ModelStore::new(&path).load().unwrap_err();
    assert!(matches!(err, ModelError::Unreadable { .. }));
    assert!(err.is_missing_model());
}

#[test]
fn test_model_without_feature_names_loads_but_is_incompatible() {
    let dir = create_temp_dir();
    let path = dir.path().join("model.json");
    let document = serde_json::json!({
        "format_version": 1,
        "estimator": {
            "type": "decision_tree",
            "nodes": [{ "kind": "leaf", "value": 3.0 }]
        }
    });
    fs::write(&path, document.to_string()).unwrap();

    let model = ModelStore::new(&path).load().unwrap();
    let err = model.feature_names().unwrap_err();
    assert!(matches!(err, ModelError::Incompatible(_)));
    assert!(!err.is_missing_model());
}

// =============================================================================
// Fingerprint and Metadata
// =============================================================================

#[test]
fn test_fingerprint_is_hex_sha256_of_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("model.json");
    fs::write(&path, "abc").unwrap();

    // SHA-256("abc")
    assert_eq!(
        ModelStore::new(&path).fingerprint().unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_metadata_describes_tree() {
    let meta = sample_model().metadata();
    assert_eq!(meta.kind, "decision_tree");
    assert_eq!(meta.tree_count, 1);
    assert_eq!(meta.node_count, 5);
    assert_eq!(meta.max_depth, 2);
    assert!(meta.decomposable);
}

#[test]
fn test_tree_walk_follows_thresholds() {
    let model = sample_model();
    let Estimator::DecisionTree(tree) = &model.estimator else {
        panic!("expected a decision tree");
    };

    assert_eq!(tree.decision_path(&[1.2, 3.0]), vec![0, 1, 2]);
    assert_eq!(tree.decision_path(&[1.3, 0.0]), vec![0, 4]);
}
