//! Extension descriptors: query and instantiate one capability's extensions

use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use ext_convert::short_type_name;

use crate::extension::Extension;
use crate::source::{DeclarativeRecord, RegistrySource};

/// Factory attribute used when a descriptor does not name another one.
pub const DEFAULT_FACTORY_ATTRIBUTE: &str = "class";

/// Why a declarative record could not be turned into an extension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstantiationFailure {
    #[error("record from '{contributor}' has no '{attribute}' factory")]
    MissingFactory {
        contributor: String,
        attribute: String,
    },

    #[error("factory from '{contributor}' did not produce a {capability}")]
    IncompatibleType {
        contributor: String,
        capability: String,
    },

    #[error("factory from '{contributor}' failed: {message}")]
    FactoryFailed {
        contributor: String,
        message: String,
    },

    #[error("factory from '{contributor}' panicked: {message}")]
    FactoryPanicked {
        contributor: String,
        message: String,
    },
}

impl InstantiationFailure {
    pub fn contributor(&self) -> &str {
        match self {
            Self::MissingFactory { contributor, .. }
            | Self::IncompatibleType { contributor, .. }
            | Self::FactoryFailed { contributor, .. }
            | Self::FactoryPanicked { contributor, .. } => contributor,
        }
    }
}

/// Binds a capability type to its extension point, element name and factory
/// attribute in a registry source.
pub struct ExtensionDescriptor<T: ?Sized> {
    capability: String,
    extension_point_id: String,
    element_name: String,
    factory_attribute: String,
    source: Arc<dyn RegistrySource>,
    _capability: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Extension + 'static> ExtensionDescriptor<T> {
    /// Describe capability `T`, using the default factory attribute.
    pub fn new(
        source: Arc<dyn RegistrySource>,
        extension_point_id: impl Into<String>,
        element_name: impl Into<String>,
    ) -> Self {
        Self {
            capability: capability_name::<T>(),
            extension_point_id: extension_point_id.into(),
            element_name: element_name.into(),
            factory_attribute: DEFAULT_FACTORY_ATTRIBUTE.to_string(),
            source,
            _capability: PhantomData,
        }
    }

    /// Use a different factory attribute.
    pub fn with_factory_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.factory_attribute = attribute.into();
        self
    }

    /// Short name of the capability type, as used in log messages.
    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn extension_point_id(&self) -> &str {
        &self.extension_point_id
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn factory_attribute(&self) -> &str {
        &self.factory_attribute
    }

    /// Records contributed for this capability. Each call queries the
    /// registry source again.
    pub fn enumerate(&self) -> impl Iterator<Item = DeclarativeRecord> + use<T> {
        let records = self
            .source
            .query(&self.extension_point_id, &self.element_name);
        tracing::debug!(
            capability = %self.capability,
            extension_point = %self.extension_point_id,
            count = records.len(),
            "Enumerated declarative records"
        );
        records.into_iter()
    }

    /// Create the extension described by one record.
    ///
    /// Failures are logged here, once, and returned to the caller.
    pub fn instantiate(&self, record: &DeclarativeRecord) -> Result<Arc<T>, InstantiationFailure> {
        let result = self.try_instantiate(record);
        match &result {
            Ok(extension) => tracing::info!(
                capability = %self.capability,
                contributor = %record.contributor(),
                key = %extension.key(),
                "Instantiated extension"
            ),
            Err(failure) => tracing::error!(
                capability = %self.capability,
                contributor = %record.contributor(),
                error = %failure,
                "Failed to instantiate extension"
            ),
        }
        result
    }

    /// Instantiate every registered record, skipping failures.
    pub fn create_registered_extensions(&self) -> Vec<Arc<T>> {
        self.enumerate()
            .filter_map(|record| self.instantiate(&record).ok())
            .collect()
    }

    fn try_instantiate(&self, record: &DeclarativeRecord) -> Result<Arc<T>, InstantiationFailure> {
        let contributor = record.contributor().to_string();
        let factory = record.factory(&self.factory_attribute).ok_or_else(|| {
            InstantiationFailure::MissingFactory {
                contributor: contributor.clone(),
                attribute: self.factory_attribute.clone(),
            }
        })?;

        let product = panic::catch_unwind(AssertUnwindSafe(|| factory()))
            .map_err(|payload| InstantiationFailure::FactoryPanicked {
                contributor: contributor.clone(),
                message: panic_message(payload.as_ref()),
            })?
            .map_err(|message| InstantiationFailure::FactoryFailed {
                contributor: contributor.clone(),
                message,
            })?;

        product
            .downcast::<Arc<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| InstantiationFailure::IncompatibleType {
                contributor,
                capability: self.capability.clone(),
            })
    }
}

impl<T: ?Sized> Clone for ExtensionDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            capability: self.capability.clone(),
            extension_point_id: self.extension_point_id.clone(),
            element_name: self.element_name.clone(),
            factory_attribute: self.factory_attribute.clone(),
            source: Arc::clone(&self.source),
            _capability: PhantomData,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for ExtensionDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionDescriptor")
            .field("capability", &self.capability)
            .field("extension_point_id", &self.extension_point_id)
            .field("element_name", &self.element_name)
            .field("factory_attribute", &self.factory_attribute)
            .finish_non_exhaustive()
    }
}

/// `dyn a::b::Resolver` becomes `Resolver`.
fn capability_name<T: ?Sized>() -> String {
    let name = short_type_name::<T>();
    match name.strip_prefix("dyn ") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
