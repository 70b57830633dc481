//! Application directories for the quill CLI.
//!
//! Everything lives under a single home directory:
//! - Linux/macOS: `~/.quill`
//! - Windows: `%APPDATA%\quill`
//!
//! Can be overridden with the `QUILL_HOME` environment variable.

use std::path::PathBuf;

/// Application name for directory paths.
pub const APP_NAME: &str = "quill";

/// Home directory name on Linux/macOS.
pub const HOME_DIR_NAME: &str = ".quill";

/// Application directories structure.
#[derive(Debug, Clone)]
pub struct AppDirs {
    /// Configuration directory (also holds data for simplicity).
    pub config_dir: PathBuf,
    /// Data directory (sessions, codebase index).
    pub data_dir: PathBuf,
}

impl AppDirs {
    /// Get application directories, respecting environment variable overrides.
    ///
    /// `QUILL_HOME` overrides everything to a single path. Relative paths are
    /// resolved against the current directory so that `QUILL_HOME=.` does not
    /// scatter files into whatever directory a command happens to run from.
    pub fn new() -> Option<Self> {
        let home_dir = dirs::home_dir()?;

        if let Ok(home) = std::env::var("QUILL_HOME") {
            let home = PathBuf::from(&home);
            let home = if home.is_relative() {
                match std::env::current_dir() {
                    Ok(cwd) => {
                        let resolved = cwd.join(&home);
                        resolved.canonicalize().unwrap_or(resolved)
                    }
                    Err(_) => home_dir.join(HOME_DIR_NAME),
                }
            } else {
                home
            };
            return Some(Self {
                config_dir: home.clone(),
                data_dir: home,
            });
        }

        #[cfg(target_os = "windows")]
        let quill_home = dirs::config_dir()?.join(APP_NAME);

        #[cfg(not(target_os = "windows"))]
        let quill_home = home_dir.join(HOME_DIR_NAME);

        Some(Self {
            config_dir: quill_home.clone(),
            data_dir: quill_home,
        })
    }

    /// Get the primary config file path (config.toml).
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Get the sessions directory.
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    /// Ensure the directories exist with owner-only permissions.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_app_dirs_creation() {
        // SAFETY: tests touching QUILL_HOME run serially
        unsafe { std::env::remove_var("QUILL_HOME") };
        let dirs = AppDirs::new();
        assert!(dirs.is_some());
    }

    #[test]
    #[serial]
    fn test_config_file_path() {
        unsafe { std::env::remove_var("QUILL_HOME") };
        let dirs = AppDirs::new().unwrap();
        assert!(dirs.config_file().ends_with("config.toml"));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        let test_path = std::env::temp_dir().join("test-quill");
        unsafe { std::env::set_var("QUILL_HOME", &test_path) };
        let dirs = AppDirs::new().unwrap();
        assert_eq!(dirs.config_dir, test_path);
        assert_eq!(dirs.data_dir, test_path);
        unsafe { std::env::remove_var("QUILL_HOME") };
    }
}
