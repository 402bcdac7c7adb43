//! Value converters for typed extension configuration.
//!
//! A [`ConverterRegistry`] maps a Rust type to a [`ValueConverter`] that
//! turns values of that type into text and back. Configuration options use
//! it to persist their values and to coerce user-supplied strings.

pub mod converter;
pub mod error;
pub mod registry;

pub use converter::{FnConverter, FromStrConverter, ValueConverter, short_type_name};
pub use error::{Error, Result};
pub use registry::ConverterRegistry;
