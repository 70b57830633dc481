//! CLI argument parsing and command dispatch.
//!
//! - `args` - command-line argument structures
//! - `handlers` - subcommand dispatch

pub mod args;
pub mod handlers;

pub use args::{Cli, ColorMode, Commands, LogLevel};
pub use handlers::dispatch_command;
