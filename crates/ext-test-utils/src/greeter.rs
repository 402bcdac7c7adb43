//! The `Greeter` test capability.

use ext_config::{Configuration, ConfigurationOption, ExtensionConfiguration};
use ext_registry::Extension;

/// Capability used throughout the workspace tests.
pub trait Greeter: Extension {
    fn greet(&self, name: &str) -> String;
}

/// Recipe for a [`TestGreeter`]. Factories build a fresh greeter from the
/// spec on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreeterSpec {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub document_types: Vec<String>,
    pub configurable: bool,
}

impl GreeterSpec {
    /// A generic, configurable greeter named after its key.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            name: key.to_string(),
            description: None,
            document_types: Vec::new(),
            configurable: true,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn document_types(mut self, document_types: &[&str]) -> Self {
        self.document_types = document_types.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Expose the null configuration instead of options.
    pub fn without_options(mut self) -> Self {
        self.configurable = false;
        self
    }

    pub fn build(&self) -> TestGreeter {
        let configuration = self.configurable.then(|| {
            ExtensionConfiguration::with_shared_converters(|| {
                Ok(vec![
                    ConfigurationOption::<String>::builder()
                        .key("greeting")
                        .name("Greeting")
                        .default_value("Hello".to_string())
                        .build_boxed()?,
                    ConfigurationOption::<i32>::builder()
                        .key("repeat")
                        .name("Repeat count")
                        .default_value(1)
                        .min(1)
                        .max(5)
                        .build_boxed()?,
                    ConfigurationOption::<bool>::builder()
                        .key("shout")
                        .default_value(false)
                        .build_boxed()?,
                ])
            })
        });
        TestGreeter {
            spec: self.clone(),
            configuration,
        }
    }
}

/// Greeter whose output depends on its `greeting`, `repeat` and `shout`
/// options.
pub struct TestGreeter {
    spec: GreeterSpec,
    configuration: Option<ExtensionConfiguration>,
}

impl TestGreeter {
    pub fn spec(&self) -> &GreeterSpec {
        &self.spec
    }

    fn option<T: ext_config::OptionType>(&self, key: &str) -> Option<T> {
        self.configuration
            .as_ref()
            .and_then(|c| c.value::<T>(key).ok().flatten())
    }
}

impl Extension for TestGreeter {
    fn key(&self) -> &str {
        &self.spec.key
    }

    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> Option<&str> {
        self.spec.description.as_deref()
    }

    fn document_types(&self) -> &[String] {
        &self.spec.document_types
    }

    fn configuration(&self) -> &dyn Configuration {
        match &self.configuration {
            Some(configuration) => configuration,
            None => &ext_config::NULL_CONFIGURATION,
        }
    }
}

impl Greeter for TestGreeter {
    fn greet(&self, name: &str) -> String {
        let greeting = self
            .option::<String>("greeting")
            .unwrap_or_else(|| "Hello".to_string());
        let repeat = self.option::<i32>("repeat").unwrap_or(1).max(1) as usize;
        let line = vec![format!("{greeting}, {name}!"); repeat].join(" ");
        if self.option::<bool>("shout").unwrap_or(false) {
            line.to_uppercase()
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greet_uses_options() {
        let greeter = GreeterSpec::new("hello").build();
        assert_eq!(greeter.greet("Ada"), "Hello, Ada!");

        greeter
            .configuration()
            .import_assignments("greeting=Hi;repeat=2;shout=true")
            .unwrap();
        assert_eq!(greeter.greet("Ada"), "HI, ADA! HI, ADA!");
    }

    #[test]
    fn test_without_options() {
        let greeter = GreeterSpec::new("plain").without_options().build();
        assert!(!greeter.configuration().is_configurable());
        assert_eq!(greeter.greet("Ada"), "Hello, Ada!");
    }
}
