//! Error types for storage operations.

use thiserror::Error;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while loading or saving persistent state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("home directory could not be determined")]
    HomeDirNotFound,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("unknown configuration key: {0}")]
    UnknownConfigKey(String),

    #[error("invalid value for {key}: {message}")]
    InvalidConfigValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
