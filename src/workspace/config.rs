//! Configuration primitives for a Compass install.
//!
//! Stored in a machine-readable TOML file located at:
//!   %APPDATA%/Compass/config/config.toml on Windows
//!   $XDG_DATA_HOME/Compass/config/config.toml on Linux
//!   ~/Library/Application Support/Compass/config/config.toml on macOS
//!
//! The config carries gateway credentials and per-install limits. API keys
//! may also come from the environment so they never have to touch disk.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the workspace root.
pub const HOME_ENV: &str = "COMPASS_HOME";
/// Environment variable holding the language model API key.
pub const LLM_API_KEY_ENV: &str = "COMPASS_ANTHROPIC_API_KEY";
/// Environment variable holding the maps/places API key.
pub const PLACES_API_KEY_ENV: &str = "COMPASS_GOOGLE_MAPS_API_KEY";

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Hosted language model used for onboarding, chat and coach replies.
    #[serde(default)]
    pub llm: LlmSettings,
    /// Geocoding and places lookups.
    #[serde(default)]
    pub places: PlacesSettings,
    /// Community feed limits.
    #[serde(default)]
    pub community: CommunitySettings,
}

impl AppConfig {
    /// Fills API keys from the environment when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = non_empty_env(LLM_API_KEY_ENV) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = non_empty_env(PLACES_API_KEY_ENV) {
            self.places.api_key = Some(key);
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Overrides the API host, mainly for proxies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Coach replies are kept short.
    #[serde(default = "default_coach_max_tokens")]
    pub coach_max_tokens: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
            coach_max_tokens: default_coach_max_tokens(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_coach_max_tokens() -> u32 {
    256
}

const fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum number of places kept per resource category.
    #[serde(default = "default_results_per_category")]
    pub results_per_category: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            results_per_category: default_results_per_category(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

const fn default_results_per_category() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySettings {
    /// Number of posts returned by a feed listing.
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
}

impl Default for CommunitySettings {
    fn default() -> Self {
        Self {
            feed_limit: default_feed_limit(),
        }
    }
}

const fn default_feed_limit() -> u32 {
    50
}

/// Returns the root directory where Compass stores data.
///
/// Order of precedence:
/// 1. `COMPASS_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("Compass"))
}

/// Path to the config file under a workspace root.
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join("config").join(CONFIG_FILE_NAME)
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;
    }
    let data = toml::to_string_pretty(config)?;
    fs::write(path, data).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}
