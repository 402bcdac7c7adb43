//! Declarative extension records and the registries that serve them

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// What a factory produces: a boxed `Arc<dyn Capability>` on success, a
/// message on failure.
pub type FactoryResult = std::result::Result<Box<dyn Any + Send>, String>;

/// A factory attached to a declarative record.
pub type FactoryFn = Arc<dyn Fn() -> FactoryResult + Send + Sync>;

/// One contribution to an extension point: the contributing component,
/// the element name, plain attributes, and named factories.
#[derive(Clone)]
pub struct DeclarativeRecord {
    contributor: String,
    element_name: String,
    attributes: BTreeMap<String, String>,
    factories: HashMap<String, FactoryFn>,
}

impl DeclarativeRecord {
    pub fn new(contributor: impl Into<String>, element_name: impl Into<String>) -> Self {
        Self {
            contributor: contributor.into(),
            element_name: element_name.into(),
            attributes: BTreeMap::new(),
            factories: HashMap::new(),
        }
    }

    /// Add a plain attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a raw factory under `attribute`.
    pub fn with_factory<F>(mut self, attribute: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> FactoryResult + Send + Sync + 'static,
    {
        self.factories.insert(attribute.into(), Arc::new(factory));
        self
    }

    /// Attach a factory producing instances of capability `T`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ext_registry::{DeclarativeRecord, Extension};
    ///
    /// trait Greeter: Extension {}
    ///
    /// struct Hello;
    /// impl Extension for Hello {
    ///     fn key(&self) -> &str { "hello" }
    ///     fn name(&self) -> &str { "Hello" }
    /// }
    /// impl Greeter for Hello {}
    ///
    /// let record = DeclarativeRecord::new("demo", "greeter")
    ///     .with_instance_factory::<dyn Greeter, _>("class", || Arc::new(Hello));
    /// assert!(record.factory("class").is_some());
    /// ```
    pub fn with_instance_factory<T, F>(self, attribute: impl Into<String>, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.with_factory(attribute, move || Ok(Box::new(factory()) as Box<dyn Any + Send>))
    }

    /// Identifier of the contributing component.
    pub fn contributor(&self) -> &str {
        &self.contributor
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn factory(&self, attribute: &str) -> Option<&FactoryFn> {
        self.factories.get(attribute)
    }
}

impl std::fmt::Debug for DeclarativeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut factories: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        factories.sort();
        f.debug_struct("DeclarativeRecord")
            .field("contributor", &self.contributor)
            .field("element_name", &self.element_name)
            .field("attributes", &self.attributes)
            .field("factories", &factories)
            .finish()
    }
}

/// Host-provided registry of declarative records.
pub trait RegistrySource: Send + Sync {
    /// All records contributed to `extension_point_id` with the given
    /// element name, in contribution order. Every call queries afresh.
    fn query(&self, extension_point_id: &str, element_name: &str) -> Vec<DeclarativeRecord>;
}

/// In-process registry populated at startup by registration calls.
#[derive(Debug, Default, Clone)]
pub struct StaticRegistry {
    points: HashMap<String, Vec<DeclarativeRecord>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contribute a record to an extension point.
    pub fn contribute(&mut self, extension_point_id: impl Into<String>, record: DeclarativeRecord) {
        let extension_point_id = extension_point_id.into();
        tracing::debug!(
            extension_point = %extension_point_id,
            contributor = %record.contributor(),
            element = %record.element_name(),
            "Registered contribution"
        );
        self.points.entry(extension_point_id).or_default().push(record);
    }

    /// Builder-style [`contribute`](Self::contribute).
    pub fn with(mut self, extension_point_id: impl Into<String>, record: DeclarativeRecord) -> Self {
        self.contribute(extension_point_id, record);
        self
    }

    /// Known extension point ids (sorted).
    pub fn extension_points(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.points.keys().map(String::as_str).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RegistrySource for StaticRegistry {
    fn query(&self, extension_point_id: &str, element_name: &str) -> Vec<DeclarativeRecord> {
        self.points
            .get(extension_point_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.element_name() == element_name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit_factory() -> FactoryResult {
        Ok(Box::new(()))
    }

    #[test]
    fn test_record_accessors() {
        let record = DeclarativeRecord::new("core", "resolver")
            .with_attribute("id", "plain")
            .with_factory("class", unit_factory);

        assert_eq!(record.contributor(), "core");
        assert_eq!(record.element_name(), "resolver");
        assert_eq!(record.attribute("id"), Some("plain"));
        assert_eq!(record.attribute("missing"), None);
        assert!(record.factory("class").is_some());
        assert!(record.factory("impl").is_none());
    }

    #[test]
    fn test_instance_factory_boxes_arc() {
        let record = DeclarativeRecord::new("core", "value")
            .with_instance_factory::<str, _>("class", || Arc::from("hello"));

        let product = (record.factory("class").unwrap())().unwrap();
        let value = product.downcast::<Arc<str>>().unwrap();
        assert_eq!(&**value, "hello");
    }

    #[test]
    fn test_static_registry_query_filters_element() {
        let registry = StaticRegistry::new()
            .with("point.a", DeclarativeRecord::new("one", "resolver"))
            .with("point.a", DeclarativeRecord::new("two", "other"))
            .with("point.a", DeclarativeRecord::new("three", "resolver"))
            .with("point.b", DeclarativeRecord::new("four", "resolver"));

        let contributors: Vec<String> = registry
            .query("point.a", "resolver")
            .iter()
            .map(|r| r.contributor().to_string())
            .collect();
        assert_eq!(contributors, vec!["one", "three"]);
        assert!(registry.query("point.c", "resolver").is_empty());
        assert_eq!(registry.extension_points(), vec!["point.a", "point.b"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_debug_lists_factory_names() {
        let record = DeclarativeRecord::new("core", "resolver").with_factory("class", unit_factory);
        let debug = format!("{record:?}");
        assert!(debug.contains("\"class\""));
    }
}
