//! Extension discovery and typed extension managers.
//!
//! A capability interface is a trait extending [`Extension`]. Its
//! implementations are advertised by a host through a [`RegistrySource`]
//! as [`DeclarativeRecord`]s carrying factories. An [`ExtensionDescriptor`]
//! knows how to query and instantiate them, and a [`TypedExtensionManager`]
//! serves them to callers through one of two storage strategies:
//!
//! - [`CachingStorage`] instantiates every extension once and keeps the
//!   instances, so identity and configuration persist across queries.
//! - [`StatelessStorage`] re-runs discovery on every query and is read-only.

pub mod descriptor;
pub mod error;
pub mod extension;
pub mod logging;
pub mod manager;
pub mod source;
pub mod storage;

pub use descriptor::{DEFAULT_FACTORY_ATTRIBUTE, ExtensionDescriptor, InstantiationFailure};
pub use error::{Error, Result};
pub use extension::{ByKey, Extension, KeyEquality};
pub use manager::TypedExtensionManager;
pub use source::{DeclarativeRecord, FactoryFn, FactoryResult, RegistrySource, StaticRegistry};
pub use storage::{CachingStorage, ExtensionStorage, StatelessStorage, StoragePolicy};
