//! Error types for the persistence layer.
//!
//! Every backend reports failures through [`StoreError`], wrapping the
//! underlying I/O, serialization, or [`fred`] error.

/// Errors that can occur while loading or saving colony state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A `Dragonfly`/Redis operation failed.
    #[error("Dragonfly error: {0}")]
    Dragonfly(#[from] fred::error::Error),

    /// A configuration error, such as an unparseable URL.
    #[error("Configuration error: {0}")]
    Config(String),
}
