//! Cross-crate scenarios for the framework's guaranteed behaviour

use std::sync::Arc;

use ext_config::{ConfigurationOption, UntypedValue};
use ext_convert::{ConverterRegistry, Error as ConvertError};
use ext_registry::Extension;
use ext_test_utils::{GreeterSpec, TestRegistry, capture_events};
use pretty_assertions::assert_eq;
use tracing::Level;

#[test]
fn test_builtin_values_round_trip() {
    let registry = ConverterRegistry::with_builtins();
    assert_eq!(registry.unmarshal::<i32>(&registry.marshal(&-17i32).unwrap()).unwrap(), -17);
    assert!(registry.unmarshal::<bool>(&registry.marshal(&true).unwrap()).unwrap());
    assert_eq!(registry.unmarshal::<f64>(&registry.marshal(&2.5f64).unwrap()).unwrap(), 2.5);
    assert_eq!(
        registry
            .unmarshal::<String>(&registry.marshal(&"text".to_string()).unwrap())
            .unwrap(),
        "text"
    );
}

#[test]
fn test_reset_to_default_restores_default() {
    let mut option = ConfigurationOption::<i64>::builder()
        .key("limit")
        .default_value(10)
        .build()
        .unwrap();
    option.set_value(99);
    option.reset_to_default();
    assert_eq!(option.value(), option.default_value());
}

#[test]
fn test_export_import_restores_values() {
    let registry = TestRegistry::new().greeter(GreeterSpec::new("alpha"));
    let source = registry.caching_manager();
    let target = registry.caching_manager();

    let configured = source.extension("alpha").unwrap();
    configured
        .configuration()
        .import_assignments("greeting=Howdy;repeat=3;shout=true")
        .unwrap();
    let exported = configured.configuration().export_assignments().unwrap();

    let restored = target.extension("alpha").unwrap();
    restored.configuration().import_assignments(&exported).unwrap();
    assert_eq!(restored.configuration().export_assignments().unwrap(), exported);
}

#[test]
fn test_unsafe_text_keeps_default_where_strict_parse_fails() {
    let registry = TestRegistry::new().greeter(GreeterSpec::new("alpha"));
    let greeter = registry.caching_manager().extension("alpha").unwrap();

    greeter
        .configuration()
        .set_option_value("repeat", UntypedValue::text("not-a-number"))
        .unwrap();
    assert_eq!(
        greeter
            .configuration()
            .get_option_value("repeat")
            .unwrap()
            .and_then(|v| v.downcast::<i32>().ok()),
        Some(1)
    );

    let strict = ConverterRegistry::shared().unmarshal::<i32>("not-a-number");
    assert!(matches!(strict, Err(ConvertError::MalformedValue { .. })));
}

#[test]
fn test_caching_same_instance_stateless_equal_keys() {
    let registry = TestRegistry::new()
        .greeter(GreeterSpec::new("alpha"))
        .greeter(GreeterSpec::new("beta"));

    let caching = registry.caching_manager();
    let first = caching.extension("beta").unwrap();
    let second = caching.extension("beta").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let stateless = registry.stateless_manager();
    let first = stateless.extension("beta").unwrap();
    let second = stateless.extension("beta").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.key(), second.key());
    assert!(stateless.equality().equals(first.as_ref(), second.as_ref()));
}

#[test]
fn test_default_extension_prefers_tagged() {
    let registry = TestRegistry::new()
        .greeter(GreeterSpec::new("x"))
        .greeter(GreeterSpec::new("y").document_types(&["docTypeA"]));
    let manager = registry.caching_manager();

    let default = manager.default_extension(&["docTypeA"]).unwrap();
    assert_eq!(default.key(), "y");
}

#[test]
fn test_one_of_three_failing_yields_two_and_one_log() {
    let registry = TestRegistry::new()
        .greeter(GreeterSpec::new("first"))
        .panicking("second")
        .greeter(GreeterSpec::new("third"));

    let (manager, events) = capture_events(|| registry.caching_manager());

    assert_eq!(manager.extensions().len(), 2);
    let failures: Vec<_> = events
        .iter()
        .filter(|e| e.level == Level::ERROR)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "Failed to instantiate extension");
    assert_eq!(failures[0].field("contributor"), Some("second"));
}
