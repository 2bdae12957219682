use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_BASE_URL;
use crate::import::DEFAULT_POSTS_PER_PAGE;
use crate::storage::Latency;
use crate::utils::paths::{get_config_path, get_data_dir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,

    /// Artificial delay on repository calls, in milliseconds. Reads use the
    /// full value, single-item lookups two thirds of it.
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,

    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Where `todos.json` lives. Defaults to `~/.todo-store/data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_posts_per_page() -> usize {
    DEFAULT_POSTS_PER_PAGE
}

fn default_simulated_latency_ms() -> u64 {
    300
}

fn default_toast_duration_ms() -> u64 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            api_base_url: default_api_base_url(),
            posts_per_page: default_posts_per_page(),
            simulated_latency_ms: default_simulated_latency_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_data_dir(),
        }
    }

    pub fn latency(&self) -> Latency {
        Latency::from_millis(self.simulated_latency_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}
