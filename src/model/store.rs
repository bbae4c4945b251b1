//! Model store
//!
//! Loads and saves the fitted model at one configured path. The store is an
//! explicit handle; callers pass the loaded `FittedModel` to the explanation
//! engine rather than reaching for shared state.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::errors::{ModelError, ModelResult};
use super::estimator::FittedModel;

/// Filesystem location of the serialized model
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    /// Create a store rooted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the model file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when a model file is present
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and validate the model.
    ///
    /// The file is opened read-only for the duration of this call.
    pub fn load(&self) -> ModelResult<FittedModel> {
        let content = self.read_bytes()?;
        let text = String::from_utf8(content).map_err(|e| self.unreadable(e.to_string()))?;

        FittedModel::from_json(&text).map_err(|e| match e {
            ModelError::Malformed(reason) => self.unreadable(reason),
            other => other,
        })
    }

    /// Validate and atomically install `model` at the store path
    pub fn save(&self, model: &FittedModel) -> ModelResult<()> {
        model.validate()?;
        let json = model.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ModelError::Io(format!("cannot create {}: {}", parent.display(), e)))?;
        }

        let tmp_path = self.temp_path();
        let write_result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(ModelError::Io(format!(
                "cannot write model to {}: {}",
                self.path.display(),
                e
            )));
        }

        Ok(())
    }

    /// Hex SHA-256 of the stored model bytes
    pub fn fingerprint(&self) -> ModelResult<String> {
        let content = self.read_bytes()?;
        Ok(format!("{:x}", Sha256::digest(&content)))
    }

    fn read_bytes(&self) -> ModelResult<Vec<u8>> {
        if !self.exists() {
            return Err(ModelError::NotFound(self.path.display().to_string()));
        }
        fs::read(&self.path).map_err(|e| self.unreadable(e.to_string()))
    }

    fn unreadable(&self, reason: impl Into<String>) -> ModelError {
        ModelError::Unreadable {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "model".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::{DecisionTree, TreeNode};
    use tempfile::TempDir;

    fn leaf_model(value: f64) -> FittedModel {
        FittedModel::decision_tree(
            vec!["x".to_string()],
            DecisionTree::new(vec![TreeNode::Leaf { value }]),
        )
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("model.json"));

        assert!(matches!(store.load(), Err(ModelError::NotFound(_))));
        assert!(store.load().unwrap_err().is_missing_model());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("nested").join("model.json"));

        store.save(&leaf_model(7.0)).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, leaf_model(7.0));
        assert!(!temp_dir.path().join("nested").join("model.json.tmp").exists());
    }

    #[test]
    fn test_garbage_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        fs::write(&path, "not json").unwrap();

        let store = ModelStore::new(&path);
        assert!(matches!(store.load(), Err(ModelError::Unreadable { .. })));
        assert!(store.load().unwrap_err().is_missing_model());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("model.json"));

        store.save(&leaf_model(1.0)).unwrap();
        let first = store.fingerprint().unwrap();
        store.save(&leaf_model(2.0)).unwrap();
        let second = store.fingerprint().unwrap();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }

    #[test]
    fn test_save_rejects_invalid_model() {
        let temp_dir = TempDir::new().unwrap();
        let store = ModelStore::new(temp_dir.path().join("model.json"));
        let model = FittedModel::random_forest(vec!["x".to_string()], vec![]);

        assert!(store.save(&model).is_err());
        assert!(!store.exists());
    }
}
