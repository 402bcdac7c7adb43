//! Error types for ext-config

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, reading or writing configurations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Converter error from ext-convert
    #[error(transparent)]
    Convert(#[from] ext_convert::Error),

    /// A value of the wrong type was supplied for an option.
    #[error("incompatible value for option '{key}': expected {expected}")]
    IncompatibleValue { key: String, expected: String },

    /// An option was built without a key.
    #[error("configuration option of type {type_name} has no key")]
    MissingKey { type_name: String },

    /// Two options of one configuration share a key.
    #[error("duplicate configuration option key: {key}")]
    DuplicateOptionKey { key: String },

    /// No option with the given key exists.
    #[error("unknown option key: {key}")]
    UnknownOptionKey { key: String },

    /// The extension has no configuration.
    #[error("extension is not configurable")]
    NotConfigurable,

    /// I/O error reading or writing the preference file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the preference file.
    #[error("failed to parse preferences: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize the preference file.
    #[error("failed to serialize preferences: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownOptionKey { key: key.into() }
    }

    pub fn incompatible(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::IncompatibleValue {
            key: key.into(),
            expected: expected.into(),
        }
    }
}
