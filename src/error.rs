//! Error types for cuedeck
//!
//! Module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the cuedeck engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration syntax errors
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Clip loading errors (wraps the loader's own error)
    #[error("Clip load error for '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Unknown symbolic event identifier
    #[error("Unknown event id: {0}")]
    UnknownEvent(String),

    /// Unknown track name
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// Playback device errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the cuedeck Error
pub type Result<T> = std::result::Result<T, Error>;
