//! Integration tests for extension configurations

use std::sync::Arc;

use ext_config::{
    Configuration, ConfigurationOption, Error, ExtensionConfiguration, PreferenceStore,
    UntypedValue, register_list_converter,
};
use ext_convert::{ConverterRegistry, FnConverter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Casing {
    Keep,
    Upper,
    Lower,
}

fn converters() -> Arc<ConverterRegistry> {
    let mut registry = ConverterRegistry::with_builtins();
    register_list_converter(&mut registry);
    registry.register::<Casing>(FnConverter::new(
        |s| match s {
            "keep" => Ok(Casing::Keep),
            "upper" => Ok(Casing::Upper),
            "lower" => Ok(Casing::Lower),
            other => Err(format!("unknown casing '{other}'")),
        },
        |c: &Casing| {
            match c {
                Casing::Keep => "keep",
                Casing::Upper => "upper",
                Casing::Lower => "lower",
            }
            .to_string()
        },
        Casing::Keep,
    ));
    Arc::new(registry)
}

fn resolver_configuration() -> ExtensionConfiguration {
    ExtensionConfiguration::new(converters(), || {
        Ok(vec![
            ConfigurationOption::<i32>::builder()
                .key("max_length")
                .name("Maximum length")
                .default_value(40)
                .min(1)
                .max(200)
                .build_boxed()?,
            ConfigurationOption::<Casing>::builder()
                .key("casing")
                .default_value(Casing::Keep)
                .build_boxed()?,
            ConfigurationOption::<Vec<String>>::builder()
                .key("skip")
                .default_value(vec!["internal".to_string()])
                .build_boxed()?,
            ConfigurationOption::<f64>::builder()
                .key("weight")
                .build_boxed()?,
        ])
    })
}

#[test]
fn test_custom_converter_types_round_trip() {
    let config = resolver_configuration();
    config.set_value("casing", Casing::Upper).unwrap();
    config
        .set_value("skip", vec!["a,b".to_string(), "c".to_string()])
        .unwrap();
    config.set_value("weight", 0.75f64).unwrap();

    let exported = config.export_assignments().unwrap();
    assert_eq!(
        exported,
        "max_length=40;casing=upper;skip=a\\,b,c;weight=0.75"
    );

    let restored = resolver_configuration();
    restored.import_assignments(&exported).unwrap();
    assert_eq!(restored.value::<Casing>("casing").unwrap(), Some(Casing::Upper));
    assert_eq!(
        restored.value::<Vec<String>>("skip").unwrap(),
        Some(vec!["a,b".to_string(), "c".to_string()])
    );
    assert_eq!(restored.value::<f64>("weight").unwrap(), Some(0.75));
}

#[test]
fn test_unset_option_round_trips_as_unset() {
    let config = resolver_configuration();
    let exported = config.export_assignments().unwrap();
    assert!(exported.ends_with("weight="));

    let restored = resolver_configuration();
    restored.set_value("weight", 2.0f64).unwrap();
    restored.import_assignments(&exported).unwrap();
    assert_eq!(restored.value::<f64>("weight").unwrap(), None);
}

#[test]
fn test_delimiters_in_values_do_not_survive() {
    let config = resolver_configuration();
    config
        .set_value("skip", vec!["a;max_length=3".to_string()])
        .unwrap();
    let exported = config.export_assignments().unwrap();

    let restored = resolver_configuration();
    restored.import_assignments(&exported).unwrap();
    assert_eq!(
        restored.value::<Vec<String>>("skip").unwrap(),
        Some(vec!["a".to_string()])
    );
    assert_eq!(restored.value::<i32>("max_length").unwrap(), Some(3));
}

#[test]
fn test_set_value_unsafe_on_integer_keeps_default() {
    let config = resolver_configuration();
    config
        .set_option_value("max_length", UntypedValue::text("not-a-number"))
        .unwrap();
    assert_eq!(config.value::<i32>("max_length").unwrap(), Some(40));

    let strict = config
        .converters()
        .unmarshal::<i32>("not-a-number")
        .unwrap_err();
    assert!(matches!(strict, ext_convert::Error::MalformedValue { .. }));
}

#[test]
fn test_unknown_enum_text_falls_back_to_default() {
    let config = resolver_configuration();
    config.set_value("casing", Casing::Lower).unwrap();
    config.import_assignments("casing=title").unwrap();
    assert_eq!(config.value::<Casing>("casing").unwrap(), Some(Casing::Keep));
}

#[test]
fn test_missing_converter_is_a_hard_error() {
    let config = ExtensionConfiguration::new(Arc::new(ConverterRegistry::with_builtins()), || {
        Ok(vec![
            ConfigurationOption::<Casing>::builder()
                .key("casing")
                .default_value(Casing::Keep)
                .build_boxed()?,
        ])
    });

    assert!(matches!(
        config.export_assignments(),
        Err(Error::Convert(ext_convert::Error::NoConverterFound { .. }))
    ));
    assert!(matches!(
        config.import_assignments("casing=upper"),
        Err(Error::Convert(ext_convert::Error::NoConverterFound { .. }))
    ));
}

#[test]
fn test_options_expose_bounds() {
    let config = resolver_configuration();
    let infos = config.options().unwrap();
    let max_length = infos.iter().find(|i| i.key == "max_length").unwrap();
    assert_eq!(max_length.min.as_deref(), Some("1"));
    assert_eq!(max_length.max.as_deref(), Some("200"));
    assert_eq!(max_length.type_name, "i32");

    let casing = infos.iter().find(|i| i.key == "casing").unwrap();
    assert_eq!(casing.type_name, "Casing");
    assert_eq!(casing.min, None);
}

#[test]
fn test_preferences_persist_assignments() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("preferences.toml");

    let config = resolver_configuration();
    config.import_assignments("max_length=12;casing=lower").unwrap();

    let mut store = PreferenceStore::load_or_create(&path).unwrap();
    store.set("resolver.plain", config.export_assignments().unwrap());
    store.save().unwrap();

    let reloaded = PreferenceStore::load(&path).unwrap();
    let restored = resolver_configuration();
    restored
        .import_assignments(reloaded.get("resolver.plain").unwrap())
        .unwrap();
    assert_eq!(restored.value::<i32>("max_length").unwrap(), Some(12));
    assert_eq!(restored.value::<Casing>("casing").unwrap(), Some(Casing::Lower));
}
