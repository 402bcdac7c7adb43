//! The ValueConverter trait and its stock implementations

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

/// Converts values of one type to and from their textual form.
///
/// `parse` reports failures as a human-readable reason; the registry wraps
/// it into [`crate::Error::MalformedValue`]. `default_value` is what the
/// lenient parsing path substitutes for unparseable input.
pub trait ValueConverter<T>: Send + Sync {
    /// Parse text into a value.
    fn parse(&self, text: &str) -> std::result::Result<T, String>;

    /// Format a value as text.
    fn format(&self, value: &T) -> String;

    /// Value used when text cannot be parsed.
    fn default_value(&self) -> T;
}

/// Converter for any type with `FromStr`, `Display` and `Default`.
///
/// All built-in converters are instances of this type.
pub struct FromStrConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ValueConverter<T> for FromStrConverter<T>
where
    T: FromStr + Display + Default,
    T::Err: Display,
{
    fn parse(&self, text: &str) -> std::result::Result<T, String> {
        text.parse::<T>().map_err(|e| e.to_string())
    }

    fn format(&self, value: &T) -> String {
        value.to_string()
    }

    fn default_value(&self) -> T {
        T::default()
    }
}

type ParseFn<T> = Box<dyn Fn(&str) -> std::result::Result<T, String> + Send + Sync>;
type FormatFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Converter assembled from closures.
///
/// Used for enum-like or domain types that have no `FromStr` impl, or whose
/// textual form differs from their `Display` output.
///
/// # Example
///
/// ```
/// use ext_convert::{ConverterRegistry, FnConverter};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Mode { Fast, Exact }
///
/// let mut registry = ConverterRegistry::with_builtins();
/// registry.register::<Mode>(FnConverter::new(
///     |s| match s {
///         "fast" => Ok(Mode::Fast),
///         "exact" => Ok(Mode::Exact),
///         other => Err(format!("unknown mode '{other}'")),
///     },
///     |m: &Mode| match m {
///         Mode::Fast => "fast".to_string(),
///         Mode::Exact => "exact".to_string(),
///     },
///     Mode::Exact,
/// ));
/// assert_eq!(registry.unmarshal::<Mode>("fast").unwrap(), Mode::Fast);
/// ```
pub struct FnConverter<T> {
    parse: ParseFn<T>,
    format: FormatFn<T>,
    default: T,
}

impl<T> FnConverter<T> {
    pub fn new<P, F>(parse: P, format: F, default: T) -> Self
    where
        P: Fn(&str) -> std::result::Result<T, String> + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            parse: Box::new(parse),
            format: Box::new(format),
            default,
        }
    }
}

impl<T: Clone + Send + Sync> ValueConverter<T> for FnConverter<T> {
    fn parse(&self, text: &str) -> std::result::Result<T, String> {
        (self.parse)(text)
    }

    fn format(&self, value: &T) -> String {
        (self.format)(value)
    }

    fn default_value(&self) -> T {
        self.default.clone()
    }
}

/// Type name with module paths stripped, e.g. `Vec<String>` instead of
/// `alloc::vec::Vec<alloc::string::String>`.
pub fn short_type_name<T: ?Sized>() -> String {
    strip_paths(std::any::type_name::<T>())
}

fn strip_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '&' | '(' | ')' | '[' | ']' | ';') {
            out.push_str(last_path_segment(&segment));
            segment.clear();
            out.push(ch);
        } else {
            segment.push(ch);
        }
    }
    out.push_str(last_path_segment(&segment));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
