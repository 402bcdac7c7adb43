//! The Extension trait and key-based identity

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ext_config::{Configuration, NULL_CONFIGURATION};

/// Common contract of every capability interface.
///
/// A capability interface is a trait extending `Extension`, handled as
/// `Arc<dyn Capability>`. Implementations are created by the registry, never
/// by callers, and hold no state apart from their configuration.
pub trait Extension: Send + Sync {
    /// Unique key identifying the extension.
    fn key(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Document types the extension applies to; empty means generic.
    fn document_types(&self) -> &[String] {
        &[]
    }

    /// The extension's options. Extensions without options keep the
    /// default, which is the shared null configuration.
    fn configuration(&self) -> &dyn Configuration {
        &NULL_CONFIGURATION
    }

    /// Whether the extension applies to every document type.
    fn is_generic(&self) -> bool {
        self.document_types().is_empty()
    }

    /// Whether the extension is tagged with any of the given document types.
    fn supports_any<S: AsRef<str>>(&self, document_types: &[S]) -> bool
    where
        Self: Sized,
    {
        matches_any(self.document_types(), document_types)
    }
}

pub(crate) fn matches_any<S: AsRef<str>>(tags: &[String], document_types: &[S]) -> bool {
    tags.iter()
        .any(|tag| document_types.iter().any(|d| d.as_ref() == tag))
}

/// Identity predicate for extensions: equal keys mean the same extension.
///
/// Different storage strategies may hand out distinct instances of the same
/// extension, and capability interfaces need not implement `PartialEq`, so
/// callers compare extensions through this value instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEquality;

impl KeyEquality {
    /// Whether `a` and `b` denote the same extension.
    pub fn equals<T: ?Sized + Extension>(&self, a: &T, b: &T) -> bool {
        std::ptr::addr_eq(a, b) || a.key() == b.key()
    }

    /// Whether `haystack` holds an extension equal to `needle`.
    pub fn contains<T: ?Sized + Extension>(&self, haystack: &[Arc<T>], needle: &T) -> bool {
        haystack.iter().any(|e| self.equals(e.as_ref(), needle))
    }

    /// Drop later duplicates, keeping the first instance of each key.
    pub fn dedup<T: ?Sized + Extension>(&self, extensions: Vec<Arc<T>>) -> Vec<Arc<T>> {
        let mut unique: Vec<Arc<T>> = Vec::with_capacity(extensions.len());
        for ext in extensions {
            if !self.contains(&unique, ext.as_ref()) {
                unique.push(ext);
            }
        }
        unique
    }
}

/// Wrapper giving an extension `Eq` and `Hash` by key, for use in sets and
/// map keys.
pub struct ByKey<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized + Extension> PartialEq for ByKey<T> {
    fn eq(&self, other: &Self) -> bool {
        KeyEquality.equals(self.0.as_ref(), other.0.as_ref())
    }
}

impl<T: ?Sized + Extension> Eq for ByKey<T> {}

impl<T: ?Sized + Extension> Hash for ByKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key().hash(state);
    }
}

impl<T: ?Sized> Clone for ByKey<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized + Extension> std::fmt::Debug for ByKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ByKey").field(&self.0.key()).finish()
    }
}
