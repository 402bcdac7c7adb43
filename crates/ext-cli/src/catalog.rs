//! Bundled string-resolver extensions
//!
//! Resolvers turn a qualified element path such as `shop::orders::Invoice`
//! into a display label. They are contributed to an in-process registry the
//! same way a host application would contribute plugins.

use std::sync::{Arc, LazyLock};

use ext_config::{
    Configuration, ConfigurationOption, ExtensionConfiguration, OptionType, register_list_converter,
};
use ext_convert::ConverterRegistry;
use ext_registry::{
    DEFAULT_FACTORY_ATTRIBUTE, DeclarativeRecord, Extension, ExtensionDescriptor, StaticRegistry,
};

/// Extension point the bundled resolvers are contributed to.
pub const EXTENSION_POINT: &str = "typed-extensions.resolvers";

/// Element name of resolver contributions.
pub const ELEMENT: &str = "resolver";

/// Separator between segments of an element path.
pub const PATH_SEPARATOR: &str = "::";

/// Capability: resolve a display label for a qualified element path.
pub trait StringResolver: Extension {
    fn resolve(&self, element: &str) -> String;
}

static CONVERTERS: LazyLock<Arc<ConverterRegistry>> = LazyLock::new(|| {
    let mut registry = ConverterRegistry::with_builtins();
    register_list_converter(&mut registry);
    Arc::new(registry)
});

/// Registry holding every bundled contribution, including one whose
/// backend is unavailable.
pub fn registry() -> StaticRegistry {
    StaticRegistry::new()
        .with(
            EXTENSION_POINT,
            contribution("core", "resolver.identity", || Arc::new(IdentityResolver::new())),
        )
        .with(
            EXTENSION_POINT,
            contribution("core", "resolver.simple", || Arc::new(SimpleNameResolver::new())),
        )
        .with(
            EXTENSION_POINT,
            contribution("core", "resolver.qualified", || {
                Arc::new(QualifiedNameResolver::new())
            }),
        )
        .with(
            EXTENSION_POINT,
            contribution("modeling", "resolver.ecore", || Arc::new(EcoreResolver::new())),
        )
        .with(
            EXTENSION_POINT,
            contribution("modeling", "resolver.uml", || Arc::new(UmlResolver::new())),
        )
        .with(
            EXTENSION_POINT,
            DeclarativeRecord::new("legacy", ELEMENT)
                .with_attribute("id", "resolver.legacy")
                .with_factory(DEFAULT_FACTORY_ATTRIBUTE, || {
                    Err("legacy resolver backend is not available".to_string())
                }),
        )
}

/// Descriptor of the `StringResolver` capability over the bundled registry.
pub fn descriptor() -> ExtensionDescriptor<dyn StringResolver> {
    ExtensionDescriptor::new(Arc::new(registry()), EXTENSION_POINT, ELEMENT)
}

fn contribution<F>(contributor: &str, id: &str, factory: F) -> DeclarativeRecord
where
    F: Fn() -> Arc<dyn StringResolver> + Send + Sync + 'static,
{
    DeclarativeRecord::new(contributor, ELEMENT)
        .with_attribute("id", id)
        .with_instance_factory::<dyn StringResolver, _>(DEFAULT_FACTORY_ATTRIBUTE, factory)
}

fn segments(element: &str) -> Vec<&str> {
    element
        .split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn truncate(label: String, max_length: i32) -> String {
    match usize::try_from(max_length) {
        Ok(max) if max > 0 && label.chars().count() > max => {
            let mut short: String = label.chars().take(max).collect();
            short.push_str("...");
            short
        }
        _ => label,
    }
}

fn max_length_option(default: i32) -> ext_config::Result<Box<dyn ext_config::AnyOption>> {
    ConfigurationOption::<i32>::builder()
        .key("max_length")
        .name("Maximum label length (0 for unlimited)")
        .default_value(default)
        .min(0)
        .max(500)
        .build_boxed()
}

fn uppercase_option() -> ext_config::Result<Box<dyn ext_config::AnyOption>> {
    ConfigurationOption::<bool>::builder()
        .key("uppercase")
        .name("Uppercase label")
        .default_value(false)
        .build_boxed()
}

fn option_or<T: OptionType>(configuration: &ExtensionConfiguration, key: &str, fallback: T) -> T {
    configuration
        .value::<T>(key)
        .ok()
        .flatten()
        .unwrap_or(fallback)
}

fn finish(configuration: &ExtensionConfiguration, label: String, default_max: i32) -> String {
    let label = if option_or(configuration, "uppercase", false) {
        label.to_uppercase()
    } else {
        label
    };
    truncate(label, option_or(configuration, "max_length", default_max))
}

/// Metadata shared by the bundled resolvers.
struct Info {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    document_types: Vec<String>,
}

impl Info {
    fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        document_types: &[&str],
    ) -> Self {
        Self {
            key,
            name,
            description,
            document_types: document_types.iter().map(|d| d.to_string()).collect(),
        }
    }
}

macro_rules! extension_metadata {
    () => {
        fn key(&self) -> &str {
            self.info.key
        }

        fn name(&self) -> &str {
            self.info.name
        }

        fn description(&self) -> Option<&str> {
            Some(self.info.description)
        }

        fn document_types(&self) -> &[String] {
            &self.info.document_types
        }
    };
}

/// Returns the element path unchanged. Has no options.
struct IdentityResolver {
    info: Info,
}

impl IdentityResolver {
    fn new() -> Self {
        Self {
            info: Info::new("resolver.identity", "Identity", "The element path as given", &[]),
        }
    }
}

impl Extension for IdentityResolver {
    extension_metadata!();
}

impl StringResolver for IdentityResolver {
    fn resolve(&self, element: &str) -> String {
        element.to_string()
    }
}

/// Last path segment only.
struct SimpleNameResolver {
    info: Info,
    configuration: ExtensionConfiguration,
}

impl SimpleNameResolver {
    fn new() -> Self {
        Self {
            info: Info::new(
                "resolver.simple",
                "Simple name",
                "Last segment of the element path",
                &[],
            ),
            configuration: ExtensionConfiguration::new(Arc::clone(&CONVERTERS), || {
                Ok(vec![max_length_option(40)?, uppercase_option()?])
            }),
        }
    }
}

impl Extension for SimpleNameResolver {
    extension_metadata!();

    fn configuration(&self) -> &dyn Configuration {
        &self.configuration
    }
}

impl StringResolver for SimpleNameResolver {
    fn resolve(&self, element: &str) -> String {
        let label = segments(element).last().copied().unwrap_or_default().to_string();
        finish(&self.configuration, label, 40)
    }
}

/// Full path, re-joined with a configurable separator, optionally dropping
/// some segments.
struct QualifiedNameResolver {
    info: Info,
    configuration: ExtensionConfiguration,
}

impl QualifiedNameResolver {
    fn new() -> Self {
        Self {
            info: Info::new(
                "resolver.qualified",
                "Qualified name",
                "Every segment of the element path",
                &[],
            ),
            configuration: ExtensionConfiguration::new(Arc::clone(&CONVERTERS), || {
                Ok(vec![
                    ConfigurationOption::<String>::builder()
                        .key("separator")
                        .name("Segment separator")
                        .default_value(".".to_string())
                        .build_boxed()?,
                    ConfigurationOption::<Vec<String>>::builder()
                        .key("skip")
                        .name("Segments to omit")
                        .default_value(Vec::new())
                        .build_boxed()?,
                    max_length_option(0)?,
                    uppercase_option()?,
                ])
            }),
        }
    }
}

impl Extension for QualifiedNameResolver {
    extension_metadata!();

    fn configuration(&self) -> &dyn Configuration {
        &self.configuration
    }
}

impl StringResolver for QualifiedNameResolver {
    fn resolve(&self, element: &str) -> String {
        let separator = option_or(&self.configuration, "separator", ".".to_string());
        let skip: Vec<String> = option_or(&self.configuration, "skip", Vec::new());
        let label = segments(element)
            .into_iter()
            .filter(|s| !skip.iter().any(|k| k == s))
            .collect::<Vec<_>>()
            .join(&separator);
        finish(&self.configuration, label, 0)
    }
}

/// `Name (package)` labels for Ecore models.
struct EcoreResolver {
    info: Info,
    configuration: ExtensionConfiguration,
}

impl EcoreResolver {
    fn new() -> Self {
        Self {
            info: Info::new(
                "resolver.ecore",
                "Ecore label",
                "Classifier name followed by its package",
                &["ecore"],
            ),
            configuration: ExtensionConfiguration::new(Arc::clone(&CONVERTERS), || {
                Ok(vec![
                    ConfigurationOption::<bool>::builder()
                        .key("show_package")
                        .name("Show package")
                        .default_value(true)
                        .build_boxed()?,
                    max_length_option(60)?,
                ])
            }),
        }
    }
}

impl Extension for EcoreResolver {
    extension_metadata!();

    fn configuration(&self) -> &dyn Configuration {
        &self.configuration
    }
}

impl StringResolver for EcoreResolver {
    fn resolve(&self, element: &str) -> String {
        let parts = segments(element);
        let label = match parts.as_slice() {
            [] => String::new(),
            [name] => (*name).to_string(),
            [.., package, name] if option_or(&self.configuration, "show_package", true) => {
                format!("{name} ({package})")
            }
            [.., name] => (*name).to_string(),
        };
        finish(&self.configuration, label, 60)
    }
}

/// `«stereotype» Name` labels for UML and SysML models.
struct UmlResolver {
    info: Info,
    configuration: ExtensionConfiguration,
}

impl UmlResolver {
    fn new() -> Self {
        Self {
            info: Info::new(
                "resolver.uml",
                "UML label",
                "Element name with its stereotype",
                &["uml", "sysml"],
            ),
            configuration: ExtensionConfiguration::new(Arc::clone(&CONVERTERS), || {
                Ok(vec![
                    ConfigurationOption::<String>::builder()
                        .key("stereotype")
                        .name("Stereotype")
                        .default_value("element".to_string())
                        .build_boxed()?,
                    max_length_option(60)?,
                    uppercase_option()?,
                ])
            }),
        }
    }
}

impl Extension for UmlResolver {
    extension_metadata!();

    fn configuration(&self) -> &dyn Configuration {
        &self.configuration
    }
}

impl StringResolver for UmlResolver {
    fn resolve(&self, element: &str) -> String {
        let name = segments(element).last().copied().unwrap_or_default();
        let stereotype = option_or(&self.configuration, "stereotype", String::new());
        let label = if stereotype.is_empty() {
            name.to_string()
        } else {
            format!("\u{ab}{stereotype}\u{bb} {name}")
        };
        finish(&self.configuration, label, 60)
    }
}
