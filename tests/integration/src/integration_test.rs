//! End-to-end test of a host wiring its own capability
//!
//! Exercises the complete flow: converter registration -> contribution ->
//! discovery -> configuration -> preference file -> next session.

use std::sync::{Arc, LazyLock};

use ext_config::{
    Configuration, ConfigurationOption, ExtensionConfiguration, PreferenceStore,
    register_list_converter,
};
use ext_convert::{ConverterRegistry, FnConverter};
use ext_registry::{
    DeclarativeRecord, Extension, ExtensionDescriptor, StaticRegistry, TypedExtensionManager,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const EXTENSION_POINT: &str = "host.highlighters";
const FACTORY: &str = "implementation";

trait Highlighter: Extension {
    fn highlight(&self, text: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Marker {
    Stars,
    Brackets,
}

static CONVERTERS: LazyLock<Arc<ConverterRegistry>> = LazyLock::new(|| {
    let mut registry = ConverterRegistry::with_builtins();
    register_list_converter(&mut registry);
    registry.register::<Marker>(FnConverter::new(
        |text| match text {
            "stars" => Ok(Marker::Stars),
            "brackets" => Ok(Marker::Brackets),
            other => Err(format!("unknown marker '{other}'")),
        },
        |marker: &Marker| match marker {
            Marker::Stars => "stars".to_string(),
            Marker::Brackets => "brackets".to_string(),
        },
        Marker::Stars,
    ));
    Arc::new(registry)
});

struct KeywordHighlighter {
    document_types: Vec<String>,
    configuration: ExtensionConfiguration,
}

impl KeywordHighlighter {
    fn new() -> Self {
        Self {
            document_types: vec!["rust".to_string()],
            configuration: ExtensionConfiguration::new(Arc::clone(&CONVERTERS), || {
                Ok(vec![
                    ConfigurationOption::<Marker>::builder()
                        .key("marker")
                        .default_value(Marker::Stars)
                        .build_boxed()?,
                    ConfigurationOption::<Vec<String>>::builder()
                        .key("keywords")
                        .default_value(vec!["fn".to_string()])
                        .build_boxed()?,
                ])
            }),
        }
    }
}

impl Extension for KeywordHighlighter {
    fn key(&self) -> &str {
        "highlighter.keywords"
    }

    fn name(&self) -> &str {
        "Keyword highlighter"
    }

    fn document_types(&self) -> &[String] {
        &self.document_types
    }

    fn configuration(&self) -> &dyn Configuration {
        &self.configuration
    }
}

impl Highlighter for KeywordHighlighter {
    fn highlight(&self, text: &str) -> String {
        let marker = self
            .configuration
            .value::<Marker>("marker")
            .ok()
            .flatten()
            .unwrap_or(Marker::Stars);
        let keywords: Vec<String> = self
            .configuration
            .value("keywords")
            .ok()
            .flatten()
            .unwrap_or_default();
        text.split(' ')
            .map(|word| match (keywords.iter().any(|k| k == word), marker) {
                (true, Marker::Stars) => format!("*{word}*"),
                (true, Marker::Brackets) => format!("[{word}]"),
                (false, _) => word.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct PlainHighlighter;

impl Extension for PlainHighlighter {
    fn key(&self) -> &str {
        "highlighter.plain"
    }

    fn name(&self) -> &str {
        "Plain text"
    }
}

impl Highlighter for PlainHighlighter {
    fn highlight(&self, text: &str) -> String {
        text.to_string()
    }
}

fn host_manager() -> TypedExtensionManager<dyn Highlighter> {
    let registry = StaticRegistry::new()
        .with(
            EXTENSION_POINT,
            DeclarativeRecord::new("host.core", "highlighter")
                .with_instance_factory::<dyn Highlighter, _>(FACTORY, || {
                    Arc::new(KeywordHighlighter::new())
                }),
        )
        .with(
            EXTENSION_POINT,
            DeclarativeRecord::new("host.core", "highlighter")
                .with_instance_factory::<dyn Highlighter, _>(FACTORY, || {
                    Arc::new(PlainHighlighter)
                }),
        )
        .with(
            EXTENSION_POINT,
            // Declares its factory under the wrong attribute
            DeclarativeRecord::new("host.plugin", "highlighter")
                .with_instance_factory::<dyn Highlighter, _>("class", || {
                    Arc::new(PlainHighlighter)
                }),
        );
    let descriptor: ExtensionDescriptor<dyn Highlighter> =
        ExtensionDescriptor::new(Arc::new(registry), EXTENSION_POINT, "highlighter")
            .with_factory_attribute(FACTORY);
    TypedExtensionManager::caching(descriptor)
}

#[test]
fn test_host_capability_end_to_end() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("prefs").join("highlighters.toml");

    // First session: discover, configure, persist
    {
        let manager = host_manager();
        assert_eq!(manager.extensions().len(), 2);

        let default = manager.default_extension(&["rust"]).unwrap();
        assert_eq!(default.key(), "highlighter.keywords");
        assert_eq!(default.highlight("pub fn main"), "pub *fn* main");

        default
            .configuration()
            .import_assignments("marker=brackets;keywords=pub,fn")
            .unwrap();
        assert_eq!(default.highlight("pub fn main"), "[pub] [fn] main");

        let mut store = PreferenceStore::load_or_create(&path).unwrap();
        manager.store_preferences(&mut store).unwrap();
        store.save().unwrap();
        assert_eq!(store.keys(), vec!["highlighter.keywords"]);
    }

    // Second session: stored preferences restore the configuration
    {
        let manager = host_manager();
        let store = PreferenceStore::load(&path).unwrap();
        assert_eq!(manager.apply_preferences(&store), 1);

        let keywords = manager.extension("highlighter.keywords").unwrap();
        assert_eq!(keywords.highlight("pub fn main"), "[pub] [fn] main");
        assert_eq!(
            keywords.configuration().export_assignments().unwrap(),
            "marker=brackets;keywords=pub,fn"
        );
    }
}

#[test]
fn test_generic_fallback_for_other_document_types() {
    let manager = host_manager();
    let default = manager.default_extension(&["python"]).unwrap();
    assert_eq!(default.key(), "highlighter.plain");
    assert_eq!(default.highlight("def main"), "def main");
}

#[test]
fn test_stale_preferences_are_tolerated() {
    let manager = host_manager();
    let mut store = PreferenceStore::new("unused.toml");
    store.set(
        "highlighter.keywords",
        "marker=underline;keywords=let;retired_option=1",
    );

    assert_eq!(manager.apply_preferences(&store), 1);
    let keywords = manager.extension("highlighter.keywords").unwrap();
    assert_eq!(keywords.highlight("let x"), "*let* x");
}
