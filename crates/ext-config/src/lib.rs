//! Configuration options and assignment strings for typed extensions.
//!
//! An extension that has adjustable parameters exposes them as an
//! [`ExtensionConfiguration`]: an ordered set of typed
//! [`ConfigurationOption`]s built lazily from a factory. Option values are
//! persisted as compact assignment strings (`key=value;key=value`) using
//! the converters of an [`ext_convert::ConverterRegistry`].
//!
//! Extensions without parameters expose [`NULL_CONFIGURATION`].

pub mod assignment;
pub mod configuration;
pub mod error;
pub mod list;
pub mod option;
pub mod preferences;
pub mod value;

pub use configuration::{Configuration, ExtensionConfiguration, NULL_CONFIGURATION, NullConfiguration};
pub use error::{Error, Result};
pub use list::{deserialize_list, register_list_converter, serialize_list};
pub use option::{AnyOption, ConfigurationOption, ConfigurationOptionBuilder, OptionInfo, OptionType};
pub use preferences::PreferenceStore;
pub use value::UntypedValue;
