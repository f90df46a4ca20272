use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// User settings persisted as TOML. Every field has a serde default so
/// files written by older versions keep loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Whether raw keystrokes are remapped to the target layout. Must stay
    /// off when the operating system already types Dvorak, otherwise the
    /// two transforms compound.
    #[serde(default = "default_mapping_enabled")]
    pub mapping_enabled: bool,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_mapping_enabled() -> bool {
    true
}
fn default_mode() -> String {
    "typing".to_string()
}
fn default_language() -> String {
    "python".to_string()
}
fn default_difficulty() -> String {
    "basic".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mapping_enabled: default_mapping_enabled(),
            mode: default_mode(),
            language: default_language(),
            difficulty: default_difficulty(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dvotype")
            .join("config.toml")
    }

    /// Reset stale keys from old configs against the currently available
    /// template languages and the known difficulty tiers.
    pub fn normalize(&mut self, valid_languages: &[&str]) {
        if !valid_languages.contains(&self.language.as_str()) {
            self.language = default_language();
        }
        if !["basic", "intermediate", "advanced"].contains(&self.difficulty.as_str()) {
            self.difficulty = default_difficulty();
        }
        if !["typing", "coding"].contains(&self.mode.as_str()) {
            self.mode = default_mode();
        }
    }
}
