//! Persistent store for extension assignment strings
//!
//! Each extension's configuration is saved as its assignment string, keyed
//! by extension key, in a TOML file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Assignment strings of configured extensions, backed by a TOML file.
///
/// ```toml
/// version = "1.0"
///
/// [assignments]
/// "resolver.qualified" = "separator=::;max_length=40"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceStore {
    /// File format version
    version: String,
    /// Assignment string per extension key
    #[serde(default)]
    assignments: BTreeMap<String, String>,
    /// Path to the preference file (not serialized)
    #[serde(skip)]
    path: PathBuf,
}

impl PreferenceStore {
    /// Create an empty store that will be saved at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            version: "1.0".to_string(),
            assignments: BTreeMap::new(),
            path: path.into(),
        }
    }

    /// Load the store from a TOML file.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        let mut store: Self = toml::from_str(&content)?;
        store.path = path;
        tracing::debug!(path = ?store.path, count = store.assignments.len(), "Loaded preferences");
        Ok(store)
    }

    /// Load the store, or create an empty one if the file does not exist.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new(path))
        }
    }

    /// Save the store, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// The stored assignment string for an extension.
    pub fn get(&self, extension_key: &str) -> Option<&str> {
        self.assignments.get(extension_key).map(String::as_str)
    }

    /// Store the assignment string for an extension.
    pub fn set(&mut self, extension_key: impl Into<String>, assignments: impl Into<String>) {
        self.assignments
            .insert(extension_key.into(), assignments.into());
    }

    /// Remove an extension's entry, returning the old assignment string.
    pub fn remove(&mut self, extension_key: &str) -> Option<String> {
        self.assignments.remove(extension_key)
    }

    /// Extension keys with stored assignments (sorted).
    pub fn keys(&self) -> Vec<&str> {
        self.assignments.keys().map(String::as_str).collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
