//! Session storage operations.

use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::paths::QuillPaths;

use super::types::{SessionSummary, StoredSession};

/// CRUD operations over saved chat sessions.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    paths: QuillPaths,
}

impl SessionStorage {
    /// Create session storage rooted at the quill home directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            paths: QuillPaths::new()?,
        })
    }

    /// Create session storage with custom paths.
    pub fn with_paths(paths: QuillPaths) -> Self {
        Self { paths }
    }

    /// Initialize storage (create directories).
    pub fn init(&self) -> Result<()> {
        self.paths.ensure_dirs()
    }

    /// The underlying paths.
    pub fn paths(&self) -> &QuillPaths {
        &self.paths
    }

    /// List all sessions, newest first. Corrupt files are skipped with a
    /// warning rather than failing the whole listing.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut sessions = Vec::new();

        if !self.paths.sessions_dir.exists() {
            return Ok(sessions);
        }

        for entry in std::fs::read_dir(&self.paths.sessions_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match Self::load_from_path(&path) {
                    Ok(session) => sessions.push(session.into()),
                    Err(e) => warn!(path = %path.display(), error = %e, "failed to load session"),
                }
            }
        }

        sessions.sort_by(|a: &SessionSummary, b: &SessionSummary| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    /// Get a session by id.
    pub fn get_session(&self, id: &str) -> Result<StoredSession> {
        let path = self.paths.session_path(id);
        if !path.exists() {
            return Err(StorageError::SessionNotFound(id.to_string()));
        }
        Self::load_from_path(&path)
    }

    /// Save a session to disk.
    pub fn save_session(&self, session: &StoredSession) -> Result<()> {
        self.paths.ensure_dirs()?;
        let path = self.paths.session_path(&session.id);
        let file = std::fs::File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, session)?;
        writer.flush()?;
        // fsync so a crash right after saving cannot lose the session
        writer.get_ref().sync_all()?;
        debug!(session_id = %session.id, "session saved");
        Ok(())
    }

    /// Delete a session by id.
    pub fn delete_session(&self, id: &str) -> Result<()> {
        let path = self.paths.session_path(id);
        if !path.exists() {
            return Err(StorageError::SessionNotFound(id.to_string()));
        }
        std::fs::remove_file(path)?;
        debug!(session_id = %id, "session deleted");
        Ok(())
    }

    /// Delete all saved sessions.
    pub fn clear_sessions(&self) -> Result<usize> {
        if !self.paths.sessions_dir.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.paths.sessions_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                std::fs::remove_file(path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Trim history down to the most recent `max_history` sessions.
    pub fn enforce_history_limit(&self, max_history: usize) -> Result<()> {
        if max_history == 0 {
            return Ok(());
        }
        let sessions = self.list_sessions()?;
        for summary in sessions.iter().skip(max_history) {
            self.delete_session(&summary.id)?;
        }
        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<StoredSession> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
