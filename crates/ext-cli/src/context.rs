//! Session state shared by the commands: the resolver manager and the
//! preference store it was configured from.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ext_config::PreferenceStore;
use ext_registry::{Extension, TypedExtensionManager};

use crate::catalog::{self, StringResolver};
use crate::error::Result;

/// Directory under the platform config dir holding the preference file.
const APP_DIR: &str = "typed-extensions";

const PREFERENCES_FILE: &str = "preferences.toml";

/// Default preference file location.
pub fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(PREFERENCES_FILE)
}

pub struct Context {
    manager: TypedExtensionManager<dyn StringResolver>,
    preferences: PreferenceStore,
}

impl Context {
    /// Discover the bundled resolvers and apply stored preferences.
    pub fn load(preferences_path: &Path) -> Result<Self> {
        let preferences = PreferenceStore::load_or_create(preferences_path)?;
        let manager = TypedExtensionManager::caching(catalog::descriptor());
        let applied = manager.apply_preferences(&preferences);
        tracing::debug!(
            path = %preferences_path.display(),
            applied,
            "Loaded extension preferences"
        );
        Ok(Self {
            manager,
            preferences,
        })
    }

    pub fn manager(&self) -> &TypedExtensionManager<dyn StringResolver> {
        &self.manager
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn extension(&self, key: &str) -> Result<Arc<dyn StringResolver>> {
        Ok(self.manager.require_extension(key)?)
    }

    /// Store the current configuration of one extension.
    pub fn persist(&mut self, extension: &dyn StringResolver) -> Result<()> {
        let assignments = extension.configuration().export_assignments()?;
        self.preferences.set(extension.key(), assignments);
        self.preferences.save()?;
        Ok(())
    }

    /// Drop the stored configuration of one extension.
    pub fn forget(&mut self, key: &str) -> Result<bool> {
        let removed = self.preferences.remove(key).is_some();
        if removed {
            self.preferences.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_preferences_path() {
        let path = default_preferences_path();
        assert!(path.ends_with("typed-extensions/preferences.toml"));
    }

    #[test]
    fn test_persist_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.toml");

        let mut ctx = Context::load(&path).unwrap();
        let simple = ctx.extension("resolver.simple").unwrap();
        simple
            .configuration()
            .import_assignments("uppercase=true")
            .unwrap();
        ctx.persist(simple.as_ref()).unwrap();

        let reloaded = Context::load(&path).unwrap();
        let simple = reloaded.extension("resolver.simple").unwrap();
        assert_eq!(simple.resolve("a::b"), "B");
        assert_eq!(reloaded.preferences().keys(), vec!["resolver.simple"]);
    }

    #[test]
    fn test_forget() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.toml");

        let mut ctx = Context::load(&path).unwrap();
        assert!(!ctx.forget("resolver.simple").unwrap());
        assert!(!path.exists());

        let uml = ctx.extension("resolver.uml").unwrap();
        ctx.persist(uml.as_ref()).unwrap();
        assert!(ctx.forget("resolver.uml").unwrap());
        assert!(PreferenceStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_extension() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::load(&temp.path().join("preferences.toml")).unwrap();
        let err = ctx.extension("resolver.legacy").err().unwrap();
        assert_eq!(err.to_string(), "unknown extension: resolver.legacy");
    }
}
