//! Error types for ext-registry

use crate::storage::StoragePolicy;

/// Result type for extension registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in extension registry operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error from ext-config
    #[error(transparent)]
    Config(#[from] ext_config::Error),

    /// The storage strategy does not support the operation.
    #[error("{operation} is not supported by {policy} extension storage")]
    UnsupportedOperation {
        operation: &'static str,
        policy: StoragePolicy,
    },

    /// No extension with the given key is known.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
}
