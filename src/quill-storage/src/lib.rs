//! Persistent storage for quill: configuration and chat-session history.
//!
//! Configuration lives in a TOML file, sessions as one JSON file each under
//! the sessions directory. Both live under the quill home directory.

pub mod config;
pub mod error;
pub mod paths;
pub mod sessions;

pub use config::Config;
pub use error::{Result, StorageError};
pub use paths::QuillPaths;
pub use sessions::{SessionStorage, SessionSummary, StoredMessage, StoredSession};
