//! Configuration loading, validation, and credential lookup for Ori.
//!
//! Loads configuration from `~/.config/ori/config.toml` with environment
//! variable overrides. The API key is resolved through a chain:
//! config file, then `ORI_API_KEY`, then `OPENROUTER_API_KEY`, then
//! `./Openrouter_api_key.txt`, then `~/.config/ori/Openrouter_api_key.txt`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const KEY_FILE_NAME: &str = "Openrouter_api_key.txt";

/// The root configuration structure.
///
/// Maps directly to `~/.config/ori/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenRouter (or compatible endpoint) API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat endpoint base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Agent loop and confirmation settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Override the system prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "tngtech/deepseek-r1t2-chimera:free".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("agent", &self.agent)
            .field("system_prompt_override", &self.system_prompt_override)
            .finish()
    }
}

/// Settings for the directive loop and execution gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Execute directives without asking. The `-y` flag also sets this.
    #[serde(default)]
    pub auto_confirm: bool,

    /// Maximum directive turns per user request before the loop stops.
    #[serde(default = "default_max_directive_turns")]
    pub max_directive_turns: u32,

    /// Kill commands after this many seconds. 0 = unlimited.
    #[serde(default)]
    pub command_timeout_secs: u64,
}

fn default_max_directive_turns() -> u32 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            auto_confirm: false,
            max_directive_turns: default_max_directive_turns(),
            command_timeout_secs: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.config/ori/config.toml).
    ///
    /// Environment overrides:
    /// - `ORI_API_KEY` / `OPENROUTER_API_KEY` for the key
    /// - `ORI_MODEL` for the model
    /// - `ORI_BASE_URL` for the endpoint
    ///
    /// When neither the file nor the environment yields a key, the key
    /// files are consulted (working directory first, then the config dir).
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("ORI_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| api_key_from_files(&Self::key_file_candidates()));
        }

        if let Ok(model) = std::env::var("ORI_MODEL") {
            config.model = model;
        }

        if let Ok(base_url) = std::env::var("ORI_BASE_URL") {
            config.base_url = base_url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".config").join("ori")
    }

    /// Create the configuration directory if it does not exist.
    pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
        let dir = Self::config_dir();
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::ReadError {
            path: dir.clone(),
            reason: e.to_string(),
        })?;
        Ok(dir)
    }

    /// Key file locations, in lookup order.
    pub fn key_file_candidates() -> Vec<PathBuf> {
        vec![
            PathBuf::from(KEY_FILE_NAME),
            Self::config_dir().join(KEY_FILE_NAME),
        ]
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_directive_turns == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_directive_turns must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config, environment, or file).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            agent: AgentConfig::default(),
            system_prompt_override: None,
        }
    }
}

/// Read the first non-empty key file from `candidates`.
fn api_key_from_files(candidates: &[PathBuf]) -> Option<String> {
    for path in candidates {
        if let Ok(content) = std::fs::read_to_string(path) {
            let key = content.trim();
            if !key.is_empty() {
                tracing::debug!(path = %path.display(), "API key loaded from file");
                return Some(key.to_string());
            }
        }
    }
    None
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
