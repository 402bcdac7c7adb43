//! [`TestRegistry`] builder for discovery scenarios.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ext_registry::{
    DEFAULT_FACTORY_ATTRIBUTE, DeclarativeRecord, ExtensionDescriptor, StaticRegistry,
    TypedExtensionManager,
};

use crate::greeter::{Greeter, GreeterSpec};

/// Extension point the builder contributes to.
pub const TEST_EXTENSION_POINT: &str = "tests.greeters";

/// Element name of every contributed record.
pub const TEST_ELEMENT: &str = "greeter";

/// A registry of greeter contributions, healthy or broken, in insertion
/// order. Counts how many times healthy factories ran.
///
/// # Example
///
/// ```rust
/// use ext_test_utils::{GreeterSpec, TestRegistry};
///
/// let registry = TestRegistry::new()
///     .greeter(GreeterSpec::new("hello"))
///     .failing("broken", "missing backend");
/// let manager = registry.caching_manager();
///
/// assert_eq!(manager.extensions().len(), 1);
/// assert_eq!(registry.instantiations(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TestRegistry {
    registry: StaticRegistry,
    instantiations: Arc<AtomicUsize>,
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRegistry {
    pub fn new() -> Self {
        Self {
            registry: StaticRegistry::new(),
            instantiations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Contribute a healthy greeter; the contributor is the spec's key.
    pub fn greeter(mut self, spec: GreeterSpec) -> Self {
        let counter = Arc::clone(&self.instantiations);
        let record = DeclarativeRecord::new(spec.key.clone(), TEST_ELEMENT)
            .with_attribute("id", spec.key.clone())
            .with_instance_factory::<dyn Greeter, _>(DEFAULT_FACTORY_ATTRIBUTE, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(spec.build())
            });
        self.registry.contribute(TEST_EXTENSION_POINT, record);
        self
    }

    /// Contribute a record whose factory returns an error.
    pub fn failing(mut self, contributor: &str, message: &str) -> Self {
        let message = message.to_string();
        let record = DeclarativeRecord::new(contributor, TEST_ELEMENT)
            .with_factory(DEFAULT_FACTORY_ATTRIBUTE, move || Err(message.clone()));
        self.registry.contribute(TEST_EXTENSION_POINT, record);
        self
    }

    /// Contribute a record whose factory panics.
    pub fn panicking(mut self, contributor: &str) -> Self {
        let record = DeclarativeRecord::new(contributor, TEST_ELEMENT)
            .with_factory(DEFAULT_FACTORY_ATTRIBUTE, || panic!("greeter factory panicked"));
        self.registry.contribute(TEST_EXTENSION_POINT, record);
        self
    }

    /// Contribute a record without a factory.
    pub fn missing_factory(mut self, contributor: &str) -> Self {
        self.registry.contribute(
            TEST_EXTENSION_POINT,
            DeclarativeRecord::new(contributor, TEST_ELEMENT),
        );
        self
    }

    /// Contribute a record whose factory produces something other than a
    /// greeter.
    pub fn incompatible(mut self, contributor: &str) -> Self {
        let record = DeclarativeRecord::new(contributor, TEST_ELEMENT).with_factory(
            DEFAULT_FACTORY_ATTRIBUTE,
            || Ok(Box::new("not a greeter") as Box<dyn Any + Send>),
        );
        self.registry.contribute(TEST_EXTENSION_POINT, record);
        self
    }

    /// Contribute a greeter under a different element name; descriptors
    /// must not see it.
    pub fn foreign_element(mut self, spec: GreeterSpec) -> Self {
        let record = DeclarativeRecord::new(spec.key.clone(), "other")
            .with_instance_factory::<dyn Greeter, _>(DEFAULT_FACTORY_ATTRIBUTE, move || {
                Arc::new(spec.build())
            });
        self.registry.contribute(TEST_EXTENSION_POINT, record);
        self
    }

    /// Times a healthy factory has run.
    pub fn instantiations(&self) -> usize {
        self.instantiations.load(Ordering::SeqCst)
    }

    pub fn descriptor(&self) -> ExtensionDescriptor<dyn Greeter> {
        ExtensionDescriptor::new(
            Arc::new(self.registry.clone()),
            TEST_EXTENSION_POINT,
            TEST_ELEMENT,
        )
    }

    pub fn caching_manager(&self) -> TypedExtensionManager<dyn Greeter> {
        TypedExtensionManager::caching(self.descriptor())
    }

    pub fn stateless_manager(&self) -> TypedExtensionManager<dyn Greeter> {
        TypedExtensionManager::stateless(self.descriptor())
    }
}
