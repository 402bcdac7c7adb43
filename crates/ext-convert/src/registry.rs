//! Converter registry storage

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::converter::{FromStrConverter, ValueConverter, short_type_name};
use crate::error::{Error, Result};

/// A registered converter together with the name of the type it serves.
struct Entry {
    type_name: String,
    /// Always an `Arc<dyn ValueConverter<T>>` for the keyed `T`.
    converter: Box<dyn Any + Send + Sync>,
}

/// Registry mapping value types to their converters.
///
/// Configurations receive a registry through `Arc<ConverterRegistry>`.
/// Register custom converters before sharing the registry; once shared it is
/// read-only. [`ConverterRegistry::shared`] returns the process-wide default
/// instance holding the built-ins.
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Entry>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Create a registry with converters for the primitive-like types.
    ///
    /// Currently registers `bool`, `i8` (byte), `char`, `f64` (double),
    /// `f32` (float), `i32` (int), `i64` (long) and `String`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<bool>(FromStrConverter::new());
        registry.register::<i8>(FromStrConverter::new());
        registry.register::<char>(FromStrConverter::new());
        registry.register::<f64>(FromStrConverter::new());
        registry.register::<f32>(FromStrConverter::new());
        registry.register::<i32>(FromStrConverter::new());
        registry.register::<i64>(FromStrConverter::new());
        registry.register::<String>(FromStrConverter::new());
        registry
    }

    /// The process-wide default registry, created on first use.
    pub fn shared() -> Arc<ConverterRegistry> {
        static SHARED: OnceLock<Arc<ConverterRegistry>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(ConverterRegistry::with_builtins()))
            .clone()
    }

    /// Register a converter for `T`, replacing any previous one.
    pub fn register<T: 'static>(&mut self, converter: impl ValueConverter<T> + 'static) {
        let converter: Arc<dyn ValueConverter<T>> = Arc::new(converter);
        self.converters.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: short_type_name::<T>(),
                converter: Box::new(converter),
            },
        );
    }

    /// Remove the converter for `T`.
    ///
    /// Returns true if a converter was registered.
    pub fn unregister<T: 'static>(&mut self) -> bool {
        self.converters.remove(&TypeId::of::<T>()).is_some()
    }

    /// Check if a converter is registered for `T`.
    pub fn contains<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Get the converter for `T`.
    pub fn converter<T: 'static>(&self) -> Result<Arc<dyn ValueConverter<T>>> {
        self.converters
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.converter.downcast_ref::<Arc<dyn ValueConverter<T>>>())
            .cloned()
            .ok_or_else(|| Error::no_converter(short_type_name::<T>()))
    }

    /// Format a value using its registered converter.
    pub fn marshal<T: 'static>(&self, value: &T) -> Result<String> {
        Ok(self.converter::<T>()?.format(value))
    }

    /// Parse text as `T`, failing with `MalformedValue` on bad input.
    pub fn unmarshal<T: 'static>(&self, text: &str) -> Result<T> {
        self.converter::<T>()?
            .parse(text)
            .map_err(|reason| Error::malformed(short_type_name::<T>(), text, reason))
    }

    /// Parse text as `T`, substituting the converter's default value on bad
    /// input. Fails only when no converter is registered.
    pub fn unmarshal_safe<T: 'static>(&self, text: &str) -> Result<T> {
        let converter = self.converter::<T>()?;
        Ok(converter
            .parse(text)
            .unwrap_or_else(|_| converter.default_value()))
    }

    /// List the names of all registered types (sorted).
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .converters
            .values()
            .map(|e| e.type_name.as_str())
            .collect();
        names.sort();
        names
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
