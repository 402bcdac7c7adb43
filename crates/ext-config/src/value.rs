//! Loosely typed option values

use std::any::Any;
use std::fmt;

/// A value handed to an option whose type the caller does not know
/// statically.
///
/// Options accept a `Typed` payload holding exactly their value type, or
/// text to be parsed through the converter registry. A `Typed` payload
/// holding a `String` is treated as text by non-string options.
pub enum UntypedValue {
    /// A value of some concrete type.
    Typed(Box<dyn Any + Send + Sync>),
    /// Text to be parsed into the option's type.
    Text(String),
}

impl UntypedValue {
    /// Wrap a concrete value.
    pub fn typed<T: Any + Send + Sync>(value: T) -> Self {
        Self::Typed(Box::new(value))
    }

    /// Wrap text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Borrow the payload as `T`.
    ///
    /// Text is only visible as `String`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => value.downcast_ref::<T>(),
            Self::Text(text) => (text as &dyn Any).downcast_ref::<T>(),
        }
    }

    /// Take the payload as `T`, handing the value back on mismatch.
    ///
    /// Text that is handed back comes back as a typed `String`.
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Self> {
        let boxed: Box<dyn Any + Send + Sync> = match self {
            Self::Typed(value) => value,
            Self::Text(text) => Box::new(text),
        };
        boxed.downcast::<T>().map(|v| *v).map_err(Self::Typed)
    }

    /// The text payload, if this is text or a typed `String`.
    pub fn as_text(&self) -> Option<&str> {
        self.downcast_ref::<String>().map(String::as_str)
    }
}

impl From<String> for UntypedValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for UntypedValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl fmt::Debug for UntypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(_) => f.write_str("Typed(..)"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_ref_typed() {
        let value = UntypedValue::typed(42i32);
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert_eq!(value.downcast_ref::<i64>(), None);
        assert_eq!(value.as_text(), None);
    }

    #[test]
    fn test_text_is_visible_as_string() {
        let value = UntypedValue::from("abc");
        assert_eq!(value.as_text(), Some("abc"));
        assert_eq!(value.downcast_ref::<String>(), Some(&"abc".to_string()));
        assert_eq!(value.downcast_ref::<i32>(), None);
    }

    #[test]
    fn test_downcast_returns_value_on_mismatch() {
        let value = UntypedValue::typed(1.5f64);
        let value = value.downcast::<i32>().unwrap_err();
        assert_eq!(value.downcast::<f64>().unwrap(), 1.5);

        let text = UntypedValue::text("x");
        let text = text.downcast::<bool>().unwrap_err();
        assert_eq!(text.downcast::<String>().unwrap(), "x");
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", UntypedValue::typed(1u8)), "Typed(..)");
        assert_eq!(format!("{:?}", UntypedValue::text("a")), "Text(\"a\")");
    }
}
