//! Typed configuration options

use std::any::Any;
use std::fmt;

use ext_convert::{ConverterRegistry, short_type_name};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::value::UntypedValue;

/// Types that can be held by a [`ConfigurationOption`].
pub trait OptionType: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> OptionType for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// A single named, typed parameter of an extension.
///
/// The key is fixed at construction and used to persist the value. The
/// current value starts out equal to the default and may be unset.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationOption<T> {
    key: String,
    name: String,
    default_value: Option<T>,
    value: Option<T>,
    min: Option<T>,
    max: Option<T>,
}

impl<T: OptionType> ConfigurationOption<T> {
    /// Start building an option.
    pub fn builder() -> ConfigurationOptionBuilder<T> {
        ConfigurationOptionBuilder::new()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_boxed(self) -> Box<dyn AnyOption> {
        Box::new(self)
    }

    /// The current value, or `None` if unset.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Clear the current value.
    pub fn unset(&mut self) {
        self.value = None;
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    pub fn set_default_value(&mut self, default_value: Option<T>) {
        self.default_value = default_value;
    }

    pub fn reset_to_default(&mut self) {
        self.value = self.default_value.clone();
    }

    /// Lower bound for presentation layers; not enforced.
    pub fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    /// Upper bound for presentation layers; not enforced.
    pub fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    /// Check that `set_value_unsafe` would accept `value`, without
    /// changing the option.
    ///
    /// Text that fails to parse is accepted here, since setting it only
    /// restores the default.
    pub fn check_value(&self, value: &UntypedValue, converters: &ConverterRegistry) -> Result<()> {
        if value.downcast_ref::<T>().is_some() {
            return Ok(());
        }
        if value.as_text().is_none() {
            return Err(Error::incompatible(&self.key, short_type_name::<T>()));
        }
        if !converters.contains::<T>() {
            return Err(ext_convert::Error::no_converter(short_type_name::<T>()).into());
        }
        Ok(())
    }

    /// Set the value from a loosely typed input.
    ///
    /// A payload of type `T` is stored as is. Text is parsed with the
    /// converter registered for `T`; if it does not parse, the option falls
    /// back to its default value. Any other payload is rejected with
    /// `IncompatibleValue`, and a missing converter is reported as an error.
    pub fn set_value_unsafe(
        &mut self,
        value: UntypedValue,
        converters: &ConverterRegistry,
    ) -> Result<()> {
        let text = match value.downcast::<T>() {
            Ok(typed) => {
                self.value = Some(typed);
                return Ok(());
            }
            Err(other) => match other.downcast::<String>() {
                Ok(text) => text,
                Err(_) => return Err(Error::incompatible(&self.key, short_type_name::<T>())),
            },
        };

        match converters.unmarshal::<T>(&text) {
            Ok(parsed) => self.value = Some(parsed),
            Err(ext_convert::Error::MalformedValue { reason, .. }) => {
                tracing::debug!(
                    key = %self.key,
                    value = %text,
                    %reason,
                    "Unparseable option value, falling back to default"
                );
                self.reset_to_default();
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

/// Builder for [`ConfigurationOption`].
///
/// `key` is required; `name` defaults to the key.
#[derive(Debug, Clone)]
pub struct ConfigurationOptionBuilder<T> {
    key: Option<String>,
    name: Option<String>,
    default_value: Option<T>,
    min: Option<T>,
    max: Option<T>,
}

impl<T: OptionType> ConfigurationOptionBuilder<T> {
    pub fn new() -> Self {
        Self {
            key: None,
            name: None,
            default_value: None,
            min: None,
            max: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn default_value(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    /// Build the option; fails with `MissingKey` if no key was given.
    pub fn build(self) -> Result<ConfigurationOption<T>> {
        let key = self.key.ok_or_else(|| Error::MissingKey {
            type_name: short_type_name::<T>(),
        })?;
        Ok(ConfigurationOption {
            name: self.name.unwrap_or_else(|| key.clone()),
            key,
            value: self.default_value.clone(),
            default_value: self.default_value,
            min: self.min,
            max: self.max,
        })
    }

    /// Build the option boxed for an option factory.
    pub fn build_boxed(self) -> Result<Box<dyn AnyOption>> {
        Ok(Box::new(self.build()?))
    }
}

impl<T: OptionType> Default for ConfigurationOptionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of an option for display and serialization.
///
/// Values are in their marshaled text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionInfo {
    pub key: String,
    pub name: String,
    pub type_name: String,
    pub is_set: bool,
    pub value: Option<String>,
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// Type-erased view of a [`ConfigurationOption`].
///
/// Lets options of different value types live in one configuration.
pub trait AnyOption: Send + Sync + fmt::Debug {
    fn key(&self) -> &str;

    fn name(&self) -> &str;

    fn type_name(&self) -> String;

    fn is_set(&self) -> bool;

    fn reset_to_default(&mut self);

    /// A copy of the current value.
    fn value_untyped(&self) -> Option<UntypedValue>;

    fn set_value_unsafe(&mut self, value: UntypedValue, converters: &ConverterRegistry)
    -> Result<()>;

    fn check_value(&self, value: &UntypedValue, converters: &ConverterRegistry) -> Result<()>;

    /// The current value as text; empty when unset.
    fn marshal_value(&self, converters: &ConverterRegistry) -> Result<String>;

    fn info(&self, converters: &ConverterRegistry) -> Result<OptionInfo>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: OptionType> AnyOption for ConfigurationOption<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> String {
        short_type_name::<T>()
    }

    fn is_set(&self) -> bool {
        self.value.is_some()
    }

    fn reset_to_default(&mut self) {
        ConfigurationOption::reset_to_default(self);
    }

    fn value_untyped(&self) -> Option<UntypedValue> {
        self.value.clone().map(UntypedValue::typed)
    }

    fn set_value_unsafe(
        &mut self,
        value: UntypedValue,
        converters: &ConverterRegistry,
    ) -> Result<()> {
        ConfigurationOption::set_value_unsafe(self, value, converters)
    }

    fn check_value(&self, value: &UntypedValue, converters: &ConverterRegistry) -> Result<()> {
        ConfigurationOption::check_value(self, value, converters)
    }

    fn marshal_value(&self, converters: &ConverterRegistry) -> Result<String> {
        match &self.value {
            Some(value) => Ok(converters.marshal(value)?),
            None => Ok(String::new()),
        }
    }

    fn info(&self, converters: &ConverterRegistry) -> Result<OptionInfo> {
        let marshal = |v: &Option<T>| -> Result<Option<String>> {
            v.as_ref()
                .map(|v| converters.marshal(v))
                .transpose()
                .map_err(Error::from)
        };
        Ok(OptionInfo {
            key: self.key.clone(),
            name: self.name.clone(),
            type_name: short_type_name::<T>(),
            is_set: self.value.is_some(),
            value: marshal(&self.value)?,
            default_value: marshal(&self.default_value)?,
            min: marshal(&self.min)?,
            max: marshal(&self.max)?,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
