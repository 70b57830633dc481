//! Storage paths for quill state.

use std::path::PathBuf;

use quill_common::AppDirs;
use tracing::debug;

use crate::error::{Result, StorageError};

/// Subdirectory and file names.
pub const SESSIONS_DIR: &str = "sessions";
pub const CONFIG_FILE: &str = "config.toml";
pub const INDEX_FILE: &str = "index.json";

/// Paths to everything quill persists.
#[derive(Debug, Clone)]
pub struct QuillPaths {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Saved chat sessions.
    pub sessions_dir: PathBuf,
}

impl QuillPaths {
    /// Create paths rooted at the quill home directory.
    pub fn new() -> Result<Self> {
        let dirs = AppDirs::new().ok_or(StorageError::HomeDirNotFound)?;
        Ok(Self::from_root(dirs.data_dir))
    }

    /// Create paths from a custom root directory.
    pub fn from_root(data_dir: PathBuf) -> Self {
        Self {
            sessions_dir: data_dir.join(SESSIONS_DIR),
            data_dir,
        }
    }

    /// Ensure all directories exist with owner-only permissions.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.sessions_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
                }
            }
        }
        debug!(data_dir = %self.data_dir.display(), "storage directories initialized");
        Ok(())
    }

    /// Path of the config file.
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Path of the persisted codebase index.
    pub fn index_file(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE)
    }

    /// Path of a session file.
    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{session_id}.json"))
    }
}
