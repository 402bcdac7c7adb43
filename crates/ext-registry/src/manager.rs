//! Typed extension manager

use std::sync::Arc;

use ext_config::PreferenceStore;

use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::extension::{Extension, KeyEquality, matches_any};
use crate::storage::{CachingStorage, ExtensionStorage, StatelessStorage, StoragePolicy};

/// Entry point for clients of one capability interface.
///
/// Combines the capability's descriptor with a storage strategy and adds
/// document-type filtering, default selection and preference handling.
///
/// ```
/// use std::sync::Arc;
/// use ext_registry::{
///     DeclarativeRecord, Extension, ExtensionDescriptor, StaticRegistry, TypedExtensionManager,
/// };
///
/// trait Formatter: Extension {}
///
/// struct Json;
/// impl Extension for Json {
///     fn key(&self) -> &str { "json" }
///     fn name(&self) -> &str { "JSON" }
/// }
/// impl Formatter for Json {}
///
/// let registry = StaticRegistry::new().with(
///     "demo.formatters",
///     DeclarativeRecord::new("demo", "formatter")
///         .with_instance_factory::<dyn Formatter, _>("class", || Arc::new(Json)),
/// );
/// let descriptor =
///     ExtensionDescriptor::<dyn Formatter>::new(Arc::new(registry), "demo.formatters", "formatter");
/// let manager = TypedExtensionManager::caching(descriptor);
///
/// assert_eq!(manager.extension("json").unwrap().name(), "JSON");
/// ```
pub struct TypedExtensionManager<T: ?Sized + Extension + 'static> {
    descriptor: ExtensionDescriptor<T>,
    storage: Box<dyn ExtensionStorage<T>>,
}

impl<T: ?Sized + Extension + 'static> TypedExtensionManager<T> {
    pub fn new(descriptor: ExtensionDescriptor<T>, storage: Box<dyn ExtensionStorage<T>>) -> Self {
        Self {
            descriptor,
            storage,
        }
    }

    /// Manager backed by [`CachingStorage`].
    pub fn caching(descriptor: ExtensionDescriptor<T>) -> Self {
        let storage = CachingStorage::new(descriptor.clone());
        Self::new(descriptor, Box::new(storage))
    }

    /// Manager backed by [`StatelessStorage`].
    pub fn stateless(descriptor: ExtensionDescriptor<T>) -> Self {
        let storage = StatelessStorage::new(descriptor.clone());
        Self::new(descriptor, Box::new(storage))
    }

    pub fn descriptor(&self) -> &ExtensionDescriptor<T> {
        &self.descriptor
    }

    pub fn policy(&self) -> StoragePolicy {
        self.storage.policy()
    }

    pub fn extensions(&self) -> Vec<Arc<T>> {
        self.storage.extensions()
    }

    pub fn extension(&self, id: &str) -> Option<Arc<T>> {
        self.storage.extension(id)
    }

    /// Like [`extension`](Self::extension), failing with `UnknownExtension`.
    pub fn require_extension(&self, id: &str) -> Result<Arc<T>> {
        self.extension(id)
            .ok_or_else(|| Error::UnknownExtension(id.to_string()))
    }

    /// Extensions tagged with any of `document_types`, plus generic ones
    /// when `include_generic` is set. Storage order is kept.
    pub fn extensions_for<S: AsRef<str>>(
        &self,
        document_types: &[S],
        include_generic: bool,
    ) -> Vec<Arc<T>> {
        self.extensions()
            .into_iter()
            .filter(|e| {
                (include_generic && e.is_generic())
                    || matches_any(e.document_types(), document_types)
            })
            .collect()
    }

    /// The preferred extension for `document_types`: tagged extensions
    /// before generic ones, then by key.
    pub fn default_extension<S: AsRef<str>>(&self, document_types: &[S]) -> Option<Arc<T>> {
        self.extensions_for(document_types, true)
            .into_iter()
            .min_by(|a, b| {
                (a.is_generic(), a.key()).cmp(&(b.is_generic(), b.key()))
            })
    }

    /// Identity predicate for extensions of this capability.
    pub fn equality(&self) -> KeyEquality {
        KeyEquality
    }

    pub fn add_extension(&mut self, extension: Arc<T>) -> Result<()> {
        self.storage.add_extension(extension)
    }

    pub fn remove_extension(&mut self, id: &str) -> Result<Option<Arc<T>>> {
        self.storage.remove_extension(id)
    }

    pub fn clear_extensions(&mut self) -> Result<()> {
        self.storage.clear_extensions()
    }

    /// Import stored assignment strings into the matching extensions.
    ///
    /// Entries that cannot be applied are logged and skipped. Returns the
    /// number of extensions configured. With stateless storage the values
    /// are imported into instances that are dropped right away.
    pub fn apply_preferences(&self, preferences: &PreferenceStore) -> usize {
        let mut applied = 0;
        for extension in self.extensions() {
            let Some(assignments) = preferences.get(extension.key()) else {
                continue;
            };
            match extension.configuration().import_assignments(assignments) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(
                    capability = %self.descriptor.capability(),
                    key = %extension.key(),
                    error = %e,
                    "Skipping stored preferences"
                ),
            }
        }
        tracing::debug!(
            capability = %self.descriptor.capability(),
            applied,
            "Applied preferences"
        );
        applied
    }

    /// Export the assignment strings of all configurable extensions.
    pub fn store_preferences(&self, preferences: &mut PreferenceStore) -> Result<()> {
        for extension in self.extensions() {
            let configuration = extension.configuration();
            if configuration.is_configurable() {
                preferences.set(extension.key(), configuration.export_assignments()?);
            }
        }
        Ok(())
    }
}

impl<T: ?Sized + Extension + 'static> std::fmt::Debug for TypedExtensionManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedExtensionManager")
            .field("descriptor", &self.descriptor)
            .field("policy", &self.storage.policy())
            .finish()
    }
}
