//! Error types for ext-convert

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting values to or from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No converter is registered for the requested type.
    #[error("no converter registered for type {type_name}")]
    NoConverterFound { type_name: String },

    /// The text could not be parsed as a value of the requested type.
    #[error("malformed {type_name} value '{value}': {reason}")]
    MalformedValue {
        type_name: String,
        value: String,
        reason: String,
    },
}

impl Error {
    pub fn no_converter(type_name: impl Into<String>) -> Self {
        Self::NoConverterFound {
            type_name: type_name.into(),
        }
    }

    pub fn malformed(
        type_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedValue {
            type_name: type_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
