//! Codebase indexing for context-augmented queries.
//!
//! Walks a project tree into a flat descriptive summary (per-file language,
//! line count, purpose) that is cheap to persist and small enough to embed in
//! a model prompt.

pub mod error;
mod index;
mod language;
pub mod report;

pub use error::{IndexError, Result};
pub use index::{CodebaseIndex, FileRecord, IndexStore};
pub use language::{detect_language, determine_purpose};
