//! Codebase index: filesystem walk and persistence.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{IndexError, Result};
use crate::language::{detect_language, determine_purpose};

/// Hidden entries worth indexing anyway.
const ALLOWED_HIDDEN: [&str; 3] = [".gitignore", ".env", ".dockerignore"];

/// Directories never worth descending into.
const SKIP_DIRS: [&str; 8] = [
    ".git",
    "node_modules",
    "vendor",
    "target",
    "bin",
    "obj",
    "build",
    "dist",
];

/// One indexed filesystem entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the indexed root, forward slashes.
    pub path: String,
    /// Final path component.
    pub name: String,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Line count; zero for directories and unreadable files.
    pub lines: usize,
    /// Size in bytes.
    pub size: u64,
    /// What the file appears to be for.
    pub purpose: String,
}

impl FileRecord {
    /// Directory depth relative to the root.
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }
}

/// Flat descriptive summary of an indexed codebase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodebaseIndex {
    pub root_path: String,
    pub files: Vec<FileRecord>,
    pub total_lines: usize,
    pub directories: usize,
    pub languages: Vec<String>,
    pub total_bytes: u64,
    /// When the index was built (Unix seconds).
    pub updated_at: i64,
    /// Model configured when the index was built.
    pub model: String,
}

impl CodebaseIndex {
    /// Number of indexed files (directories excluded).
    pub fn file_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_dir).count()
    }
}

/// Builds, persists and loads the codebase index.
#[derive(Debug, Clone)]
pub struct IndexStore {
    index_file: PathBuf,
}

impl IndexStore {
    /// Create a store persisting to the given file.
    pub fn new(index_file: PathBuf) -> Self {
        Self { index_file }
    }

    /// Walk `root` and persist the resulting index.
    pub fn build(&self, root: &Path, model: &str) -> Result<CodebaseIndex> {
        if !root.exists() {
            return Err(IndexError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(IndexError::NotADirectory(root.to_path_buf()));
        }

        let mut index = CodebaseIndex {
            root_path: root.to_string_lossy().to_string(),
            files: Vec::new(),
            total_lines: 0,
            directories: 0,
            languages: Vec::new(),
            total_bytes: 0,
            updated_at: Utc::now().timestamp(),
            model: model.to_string(),
        };

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(keep_entry);

        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            let name = entry.file_name().to_string_lossy().to_string();
            let metadata = entry.metadata()?;

            let mut record = FileRecord {
                path: relative.clone(),
                name: name.clone(),
                is_dir: entry.file_type().is_dir(),
                language: None,
                lines: 0,
                size: metadata.len(),
                purpose: determine_purpose(&name, &relative).to_string(),
            };

            if record.is_dir {
                index.directories += 1;
            } else {
                record.language = detect_language(&name).map(str::to_string);
                record.lines = count_lines(entry.path());
                index.total_lines += record.lines;

                if let Some(ref language) = record.language
                    && !index.languages.contains(language)
                {
                    index.languages.push(language.clone());
                }
            }

            index.total_bytes += record.size;
            index.files.push(record);
        }

        self.save(&index)?;
        debug!(
            files = index.files.len(),
            lines = index.total_lines,
            "codebase index built"
        );
        Ok(index)
    }

    /// Load the persisted index.
    pub fn load(&self) -> Result<CodebaseIndex> {
        if !self.index_file.exists() {
            return Err(IndexError::IndexNotBuilt);
        }
        let raw = std::fs::read_to_string(&self.index_file)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Remove the persisted index.
    pub fn clear(&self) -> Result<()> {
        if !self.index_file.exists() {
            return Err(IndexError::IndexNotBuilt);
        }
        std::fs::remove_file(&self.index_file)?;
        Ok(())
    }

    fn save(&self, index: &CodebaseIndex) -> Result<()> {
        if let Some(parent) = self.index_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(index)?;
        std::fs::write(&self.index_file, raw)?;
        Ok(())
    }
}

/// Walk filter: skip hidden entries (with a small allowlist) and vendored or
/// generated directories.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return ALLOWED_HIDDEN.contains(&name.as_ref());
    }
    if entry.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()) {
        return false;
    }
    true
}

fn count_lines(path: &Path) -> usize {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).split('\n').count(),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn populate(root: &Path) {
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::create_dir_all(root.join(".hidden")).unwrap();
        std::fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
        std::fs::write(root.join("Cargo.toml"), "[package]\nname = \"x\"\n").unwrap();
        std::fs::write(root.join(".gitignore"), "target\n").unwrap();
        std::fs::write(root.join(".secret"), "nope").unwrap();
        std::fs::write(root.join("node_modules/pkg/index.js"), "x\n").unwrap();
    }

    #[test]
    fn test_build_walks_and_filters() {
        let dir = tempdir().unwrap();
        populate(dir.path());
        let store = IndexStore::new(dir.path().join("state/index.json"));

        let index = store.build(dir.path(), "test-model").unwrap();

        let paths: Vec<&str> = index.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"src/main.rs"));
        assert!(paths.contains(&"Cargo.toml"));
        assert!(paths.contains(&".gitignore"));
        assert!(!paths.iter().any(|p| p.contains("node_modules")));
        assert!(!paths.iter().any(|p| p.contains(".secret")));
        assert!(!paths.iter().any(|p| p.contains(".hidden")));

        assert_eq!(index.directories, 1); // src
        assert!(index.languages.iter().any(|l| l == "Rust"));
        assert!(index.total_lines > 0);
        assert_eq!(index.model, "test-model");
    }

    #[test]
    fn test_load_roundtrip_and_clear() {
        let dir = tempdir().unwrap();
        populate(dir.path());
        let store = IndexStore::new(dir.path().join("index.json"));

        let built = store.build(dir.path(), "test-model").unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.files.len(), built.files.len());
        assert_eq!(loaded.total_lines, built.total_lines);

        store.clear().unwrap();
        assert!(matches!(store.load(), Err(IndexError::IndexNotBuilt)));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        let err = store.build(&dir.path().join("absent"), "m").unwrap_err();
        assert!(matches!(err, IndexError::RootNotFound(_)));
    }

    #[test]
    fn test_file_count_excludes_directories() {
        let dir = tempdir().unwrap();
        populate(dir.path());
        let store = IndexStore::new(dir.path().join("index.json"));
        let index = store.build(dir.path(), "m").unwrap();
        assert_eq!(index.file_count(), index.files.len() - index.directories);
    }
}
