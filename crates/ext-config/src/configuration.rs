//! Extension configurations and the null configuration

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ext_convert::ConverterRegistry;

use crate::assignment::{format_assignments, parse_assignments};
use crate::error::{Error, Result};
use crate::option::{AnyOption, ConfigurationOption, OptionInfo, OptionType};
use crate::value::UntypedValue;

/// The configuration surface an extension exposes.
///
/// Implemented by [`ExtensionConfiguration`] for configurable extensions and
/// by [`NullConfiguration`] for the rest. All methods take `&self`, so a
/// configuration can be changed through a shared extension instance.
pub trait Configuration: Send + Sync {
    /// Whether this configuration has options at all.
    fn is_configurable(&self) -> bool;

    /// Snapshot of every option, in declaration order.
    fn options(&self) -> Result<Vec<OptionInfo>>;

    /// Option keys in declaration order.
    fn option_keys(&self) -> Result<Vec<String>>;

    fn get_option_value(&self, key: &str) -> Result<Option<UntypedValue>>;

    fn set_option_value(&self, key: &str, value: UntypedValue) -> Result<()>;

    fn get_all_as_map(&self) -> Result<HashMap<String, Option<UntypedValue>>>;

    /// Set several options at once. On error no option is changed.
    fn set_all_from_map(&self, values: HashMap<String, UntypedValue>) -> Result<()>;

    fn reset_to_defaults(&self) -> Result<()>;

    /// Serialize all options as `key1=value1;key2=value2`.
    fn export_assignments(&self) -> Result<String>;

    /// Apply an assignment string produced by `export_assignments`.
    ///
    /// Keys that match no option are ignored. On error no option is changed.
    fn import_assignments(&self, assignments: &str) -> Result<()>;
}

type OptionFactory = Box<dyn Fn() -> Result<Vec<Box<dyn AnyOption>>> + Send + Sync>;

/// Ordered set of options belonging to one extension instance.
///
/// Options are created by the factory on first access and kept for the
/// lifetime of the configuration.
///
/// # Example
///
/// ```
/// use ext_config::{Configuration, ConfigurationOption, ExtensionConfiguration};
///
/// let config = ExtensionConfiguration::with_shared_converters(|| {
///     Ok(vec![
///         ConfigurationOption::<i32>::builder()
///             .key("depth")
///             .default_value(3)
///             .build_boxed()?,
///         ConfigurationOption::<bool>::builder()
///             .key("strict")
///             .default_value(false)
///             .build_boxed()?,
///     ])
/// });
///
/// config.import_assignments("depth=7;strict=true").unwrap();
/// assert_eq!(config.value::<i32>("depth").unwrap(), Some(7));
/// assert_eq!(config.export_assignments().unwrap(), "depth=7;strict=true");
/// ```
pub struct ExtensionConfiguration {
    converters: Arc<ConverterRegistry>,
    factory: OptionFactory,
    options: OnceLock<RwLock<Vec<Box<dyn AnyOption>>>>,
}

impl ExtensionConfiguration {
    /// Create a configuration whose options come from `factory`.
    pub fn new<F>(converters: Arc<ConverterRegistry>, factory: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn AnyOption>>> + Send + Sync + 'static,
    {
        Self {
            converters,
            factory: Box::new(factory),
            options: OnceLock::new(),
        }
    }

    /// Create a configuration using the process-wide converter registry.
    pub fn with_shared_converters<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn AnyOption>>> + Send + Sync + 'static,
    {
        Self::new(ConverterRegistry::shared(), factory)
    }

    pub fn converters(&self) -> &Arc<ConverterRegistry> {
        &self.converters
    }

    /// Whether the options have been built yet.
    pub fn is_initialized(&self) -> bool {
        self.options.get().is_some()
    }

    /// The current value of a typed option.
    pub fn value<T: OptionType>(&self, key: &str) -> Result<Option<T>> {
        self.with_option::<T, _>(key, |opt| opt.value().cloned())
    }

    /// Set a typed option. Text is parsed as by `set_option_value`.
    pub fn set_value<T: OptionType>(&self, key: &str, value: T) -> Result<()> {
        self.set_option_value(key, UntypedValue::typed(value))
    }

    /// Run `f` on the option with the given key and value type.
    ///
    /// `f` runs while the options are locked, so it must not call back into
    /// this configuration or it will deadlock.
    pub fn with_option<T, R>(
        &self,
        key: &str,
        f: impl FnOnce(&ConfigurationOption<T>) -> R,
    ) -> Result<R>
    where
        T: OptionType,
    {
        let options = self.read()?;
        let opt = find(&options, key)?;
        let typed = opt
            .as_any()
            .downcast_ref::<ConfigurationOption<T>>()
            .ok_or_else(|| Error::incompatible(key, opt.type_name()))?;
        Ok(f(typed))
    }

    /// Run `f` on the mutable option with the given key and value type.
    ///
    /// `f` runs under the write lock; calling back into this configuration
    /// from `f` deadlocks.
    pub fn with_option_mut<T, R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut ConfigurationOption<T>) -> R,
    ) -> Result<R>
    where
        T: OptionType,
    {
        let mut options = self.write()?;
        let opt = find_mut(&mut options, key)?;
        let type_name = opt.type_name();
        let typed = opt
            .as_any_mut()
            .downcast_mut::<ConfigurationOption<T>>()
            .ok_or_else(|| Error::incompatible(key, type_name))?;
        Ok(f(typed))
    }

    fn lock(&self) -> Result<&RwLock<Vec<Box<dyn AnyOption>>>> {
        if let Some(options) = self.options.get() {
            return Ok(options);
        }
        let built = (self.factory)()?;
        let mut seen = HashSet::new();
        for opt in &built {
            if !seen.insert(opt.key()) {
                return Err(Error::DuplicateOptionKey {
                    key: opt.key().to_string(),
                });
            }
        }
        tracing::debug!(count = built.len(), "Built configuration options");
        Ok(self.options.get_or_init(|| RwLock::new(built)))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Box<dyn AnyOption>>>> {
        Ok(self.lock()?.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Box<dyn AnyOption>>>> {
        Ok(self.lock()?.write().unwrap_or_else(PoisonError::into_inner))
    }
}

fn find<'a>(options: &'a [Box<dyn AnyOption>], key: &str) -> Result<&'a dyn AnyOption> {
    options
        .iter()
        .find(|opt| opt.key() == key)
        .map(|opt| &**opt)
        .ok_or_else(|| Error::unknown_key(key))
}

fn position(options: &[Box<dyn AnyOption>], key: &str) -> Option<usize> {
    options.iter().position(|opt| opt.key() == key)
}

/// Write values that have all passed `check_value`.
fn apply(
    options: &mut [Box<dyn AnyOption>],
    staged: Vec<(usize, UntypedValue)>,
    converters: &ConverterRegistry,
) -> Result<()> {
    for (index, value) in staged {
        options[index].set_value_unsafe(value, converters)?;
    }
    Ok(())
}

fn find_mut<'a>(
    options: &'a mut [Box<dyn AnyOption>],
    key: &str,
) -> Result<&'a mut Box<dyn AnyOption>> {
    options
        .iter_mut()
        .find(|opt| opt.key() == key)
        .ok_or_else(|| Error::unknown_key(key))
}

impl Configuration for ExtensionConfiguration {
    fn is_configurable(&self) -> bool {
        true
    }

    fn options(&self) -> Result<Vec<OptionInfo>> {
        self.read()?
            .iter()
            .map(|opt| opt.info(&self.converters))
            .collect()
    }

    fn option_keys(&self) -> Result<Vec<String>> {
        Ok(self.read()?.iter().map(|opt| opt.key().to_string()).collect())
    }

    fn get_option_value(&self, key: &str) -> Result<Option<UntypedValue>> {
        let options = self.read()?;
        Ok(find(&options, key)?.value_untyped())
    }

    fn set_option_value(&self, key: &str, value: UntypedValue) -> Result<()> {
        let mut options = self.write()?;
        find_mut(&mut options, key)?.set_value_unsafe(value, &self.converters)
    }

    fn get_all_as_map(&self) -> Result<HashMap<String, Option<UntypedValue>>> {
        Ok(self
            .read()?
            .iter()
            .map(|opt| (opt.key().to_string(), opt.value_untyped()))
            .collect())
    }

    fn set_all_from_map(&self, values: HashMap<String, UntypedValue>) -> Result<()> {
        let mut options = self.write()?;
        let mut staged = Vec::with_capacity(values.len());
        for (key, value) in values {
            let index = position(&options, &key).ok_or_else(|| Error::unknown_key(&key))?;
            options[index].check_value(&value, &self.converters)?;
            staged.push((index, value));
        }
        apply(&mut options, staged, &self.converters)
    }

    fn reset_to_defaults(&self) -> Result<()> {
        for opt in self.write()?.iter_mut() {
            opt.reset_to_default();
        }
        Ok(())
    }

    fn export_assignments(&self) -> Result<String> {
        let options = self.read()?;
        let values = options
            .iter()
            .map(|opt| opt.marshal_value(&self.converters))
            .collect::<Result<Vec<_>>>()?;
        Ok(format_assignments(
            options
                .iter()
                .zip(&values)
                .map(|(opt, value)| (opt.key(), value.as_str())),
        ))
    }

    fn import_assignments(&self, assignments: &str) -> Result<()> {
        let mut options = self.write()?;
        let mut staged = Vec::new();
        for (key, value) in parse_assignments(assignments) {
            let Some(index) = position(&options, key) else {
                tracing::debug!(key, "Ignoring assignment for unknown option");
                continue;
            };
            let value = UntypedValue::text(value);
            options[index].check_value(&value, &self.converters)?;
            staged.push((index, value));
        }
        apply(&mut options, staged, &self.converters)
    }
}

impl std::fmt::Debug for ExtensionConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionConfiguration")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Configuration of an extension that has no options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullConfiguration;

/// The shared [`NullConfiguration`] instance.
pub static NULL_CONFIGURATION: NullConfiguration = NullConfiguration;

impl Configuration for NullConfiguration {
    fn is_configurable(&self) -> bool {
        false
    }

    fn options(&self) -> Result<Vec<OptionInfo>> {
        Ok(Vec::new())
    }

    fn option_keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn get_option_value(&self, _key: &str) -> Result<Option<UntypedValue>> {
        Err(Error::NotConfigurable)
    }

    fn set_option_value(&self, _key: &str, _value: UntypedValue) -> Result<()> {
        Err(Error::NotConfigurable)
    }

    fn get_all_as_map(&self) -> Result<HashMap<String, Option<UntypedValue>>> {
        Ok(HashMap::new())
    }

    fn set_all_from_map(&self, values: HashMap<String, UntypedValue>) -> Result<()> {
        if values.is_empty() {
            Ok(())
        } else {
            Err(Error::NotConfigurable)
        }
    }

    fn reset_to_defaults(&self) -> Result<()> {
        Ok(())
    }

    fn export_assignments(&self) -> Result<String> {
        Ok(String::new())
    }

    fn import_assignments(&self, assignments: &str) -> Result<()> {
        if assignments.is_empty() {
            Ok(())
        } else {
            Err(Error::NotConfigurable)
        }
    }
}
