//! Configuration load/save.
//!
//! The config file is TOML at `<quill home>/config.toml`. Missing file means
//! defaults; `QUILL_API_KEY`, `QUILL_MODEL` and `QUILL_BASE_URL` override
//! whatever the file says.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::paths::QuillPaths;

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default chat-completions endpoint URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default cap on sessions kept in history.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Application configuration.
///
/// `max_tokens` and `temperature` of zero mean "use the provider default";
/// they are never sent on the wire in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_history: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_history: DEFAULT_MAX_HISTORY,
            max_tokens: 0,
            temperature: 0.0,
        }
    }
}

impl Config {
    /// Load configuration from disk, applying environment overrides.
    pub fn load(paths: &QuillPaths) -> Result<Self> {
        let path = paths.config_file();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            toml::from_str(&raw)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        for (var, field) in [
            ("QUILL_API_KEY", &mut self.api_key as &mut String),
            ("QUILL_MODEL", &mut self.model),
            ("QUILL_BASE_URL", &mut self.base_url),
        ] {
            if let Ok(value) = std::env::var(var)
                && !value.is_empty()
            {
                *field = value;
            }
        }
    }

    /// Save configuration to disk with owner-only file permissions.
    pub fn save(&self, paths: &QuillPaths) -> Result<()> {
        paths.ensure_dirs()?;
        let path = paths.config_file();
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Set a configuration value from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value.parse().map_err(|_| StorageError::InvalidConfigValue {
                key: key.to_string(),
                message: format!("could not parse {value:?}"),
            })
        }

        match key {
            "api_key" => self.api_key = value.to_string(),
            "model" => self.model = value.to_string(),
            "base_url" => self.base_url = value.to_string(),
            "max_history" => self.max_history = parse(key, value)?,
            "max_tokens" => self.max_tokens = parse(key, value)?,
            "temperature" => self.temperature = parse(key, value)?,
            _ => return Err(StorageError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// API key masked for display: first and last four characters visible.
    pub fn masked_api_key(&self) -> String {
        if self.api_key.is_empty() {
            return "not set".to_string();
        }
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
    }

    /// Settings as display rows, key masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("model", self.model.clone()),
            ("api_key", self.masked_api_key()),
            ("base_url", self.base_url.clone()),
            ("max_history", self.max_history.to_string()),
            ("max_tokens", self.max_tokens.to_string()),
            ("temperature", format!("{:.2}", self.temperature)),
        ]
    }
}
