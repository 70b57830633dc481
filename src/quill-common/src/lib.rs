//! Shared utilities for the quill CLI.
//!
//! Small helpers used across the workspace: application directories,
//! assistant-response post-processing and text formatting.

pub mod bytes;
pub mod clean;
pub mod dirs;
pub mod duration;
pub mod truncate;

pub use bytes::format_bytes;
pub use clean::clean_response;
pub use dirs::AppDirs;
pub use duration::format_duration;
pub use truncate::{session_title, truncate_chars};
