//! quill CLI: argument surface, command handlers, terminal presentation.
//!
//! # Architecture
//!
//! - `cli/` - command-line argument parsing and dispatch
//! - `*_cmd.rs` - individual command implementations
//! - `ui` / `spinner` - terminal rendering, constructed once and passed down
//! - `stream` / `session` - streamed-response consumption and chat turns

pub mod chat_cmd;
pub mod cli;
pub mod code_cmd;
pub mod config_cmd;
pub mod files_cmd;
pub mod history_cmd;
pub mod index_cmd;
pub mod session;
pub mod spinner;
pub mod stream;
pub mod ui;
