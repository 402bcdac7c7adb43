//! Storage strategies behind a typed extension manager

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::extension::Extension;

/// How a storage strategy holds extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePolicy {
    /// Instances are created once and reused.
    Caching,
    /// Instances are created on every query.
    Stateless,
}

impl fmt::Display for StoragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoragePolicy::Caching => write!(f, "caching"),
            StoragePolicy::Stateless => write!(f, "stateless"),
        }
    }
}

/// Holds or produces the extensions of one capability.
pub trait ExtensionStorage<T: ?Sized + Extension>: Send + Sync {
    fn policy(&self) -> StoragePolicy;

    /// All extensions.
    fn extensions(&self) -> Vec<Arc<T>>;

    /// The extension with the given key.
    fn extension(&self, id: &str) -> Option<Arc<T>> {
        self.extensions().into_iter().find(|e| e.key() == id)
    }

    /// Add an extension, replacing any with the same key.
    fn add_extension(&mut self, extension: Arc<T>) -> Result<()>;

    /// Remove the extension with the given key.
    fn remove_extension(&mut self, id: &str) -> Result<Option<Arc<T>>>;

    /// Remove all extensions.
    fn clear_extensions(&mut self) -> Result<()>;
}

/// Instantiates every registered extension once, at construction, and
/// serves the same instances afterwards.
pub struct CachingStorage<T: ?Sized + Extension + 'static> {
    descriptor: ExtensionDescriptor<T>,
    extensions: HashMap<String, Arc<T>>,
}

impl<T: ?Sized + Extension + 'static> CachingStorage<T> {
    pub fn new(descriptor: ExtensionDescriptor<T>) -> Self {
        let mut storage = Self {
            descriptor,
            extensions: HashMap::new(),
        };
        storage.reload();
        storage
    }

    /// Discard all cached instances and re-run discovery.
    ///
    /// When two records produce the same key the later one wins.
    pub fn reload(&mut self) {
        self.extensions.clear();
        for extension in self.descriptor.create_registered_extensions() {
            let key = extension.key().to_string();
            if self.extensions.insert(key.clone(), extension).is_some() {
                tracing::warn!(
                    capability = %self.descriptor.capability(),
                    key = %key,
                    "Duplicate extension key, keeping the later contribution"
                );
            }
        }
    }

    pub fn descriptor(&self) -> &ExtensionDescriptor<T> {
        &self.descriptor
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl<T: ?Sized + Extension + 'static> ExtensionStorage<T> for CachingStorage<T> {
    fn policy(&self) -> StoragePolicy {
        StoragePolicy::Caching
    }

    /// Cached extensions, sorted by key.
    fn extensions(&self) -> Vec<Arc<T>> {
        let mut keys: Vec<&String> = self.extensions.keys().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(|k| self.extensions.get(k).cloned())
            .collect()
    }

    fn extension(&self, id: &str) -> Option<Arc<T>> {
        self.extensions.get(id).cloned()
    }

    fn add_extension(&mut self, extension: Arc<T>) -> Result<()> {
        self.extensions
            .insert(extension.key().to_string(), extension);
        Ok(())
    }

    fn remove_extension(&mut self, id: &str) -> Result<Option<Arc<T>>> {
        Ok(self.extensions.remove(id))
    }

    fn clear_extensions(&mut self) -> Result<()> {
        self.extensions.clear();
        Ok(())
    }
}

impl<T: ?Sized + Extension + 'static> fmt::Debug for CachingStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.extensions.keys().collect();
        keys.sort();
        f.debug_struct("CachingStorage")
            .field("descriptor", &self.descriptor)
            .field("extensions", &keys)
            .finish()
    }
}

/// Re-runs discovery on every query. Returned instances are fresh each
/// time and mutation is unsupported.
pub struct StatelessStorage<T: ?Sized + Extension + 'static> {
    descriptor: ExtensionDescriptor<T>,
}

impl<T: ?Sized + Extension + 'static> StatelessStorage<T> {
    pub fn new(descriptor: ExtensionDescriptor<T>) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &ExtensionDescriptor<T> {
        &self.descriptor
    }

    fn unsupported(operation: &'static str) -> Error {
        Error::UnsupportedOperation {
            operation,
            policy: StoragePolicy::Stateless,
        }
    }
}

impl<T: ?Sized + Extension + 'static> ExtensionStorage<T> for StatelessStorage<T> {
    fn policy(&self) -> StoragePolicy {
        StoragePolicy::Stateless
    }

    /// Fresh instances, in registry order.
    fn extensions(&self) -> Vec<Arc<T>> {
        self.descriptor.create_registered_extensions()
    }

    fn add_extension(&mut self, _extension: Arc<T>) -> Result<()> {
        Err(Self::unsupported("add_extension"))
    }

    fn remove_extension(&mut self, _id: &str) -> Result<Option<Arc<T>>> {
        Err(Self::unsupported("remove_extension"))
    }

    fn clear_extensions(&mut self) -> Result<()> {
        Err(Self::unsupported("clear_extensions"))
    }
}

impl<T: ?Sized + Extension + 'static> fmt::Debug for StatelessStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatelessStorage")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
