//! Configuration for throttledqueue

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::queue::QueueConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Queue settings (tau_ms, max_pending)
    #[serde(default)]
    pub queue: QueueConfig,

    /// Jobs pushed by `tq run` when --jobs is not given
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_jobs() -> usize {
    crate::DEFAULT_JOBS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            jobs: default_jobs(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from(config_path);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("throttledqueue").join("config.yml")),
            Some(PathBuf::from("throttledqueue.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Config::default())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
