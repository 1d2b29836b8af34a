// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Directory holding `ats_scorer.py` and `job_suggestion.py`
    pub scripts_path: PathBuf,
    /// Parent directory of the per-request `temp_<uuid>` workspaces
    pub workspace_path: PathBuf,
    pub database_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            scripts_path: PathBuf::from("python_scripts"),
            workspace_path: std::env::temp_dir().join("resume-analyzer"),
            database_path: PathBuf::from("data/resumes.db"),
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        let config_path = base_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            info!("{} not found, using built-in defaults", CONFIG_FILE);
            return Ok(Self::default().resolved(&base_dir));
        }

        Self::load_from_file(&config_path, &environment).map(|config| config.resolved(&base_dir))
    }

    fn get_environment() -> String {
        std::env::var("ANALYZER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_yaml(&config_content, environment)
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Make every relative path absolute against `base_dir`
    pub fn resolved(self, base_dir: &Path) -> Self {
        Self {
            scripts_path: resolve_path(base_dir, self.scripts_path),
            workspace_path: resolve_path(base_dir, self.workspace_path),
            database_path: resolve_path(base_dir, self.database_path),
        }
    }
}

/// `path` as is when absolute, otherwise joined onto `base_dir`
pub fn resolve_path(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
