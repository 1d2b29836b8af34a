// src/core/config_manager.rs
//! Unified configuration: file-based paths plus environment overrides

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::core::FsOps;
use crate::environment::{resolve_path, EnvironmentConfig};
use crate::pipeline::default_interpreter;
use crate::pipeline::invoker::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_PORT: u16 = 5000;
pub const ATS_SCRIPT_NAME: &str = "ats_scorer.py";
pub const JOB_SUGGESTION_SCRIPT_NAME: &str = "job_suggestion.py";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub pipeline: PipelineConfig,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub interpreter: String,
    pub ats_script: PathBuf,
    pub job_suggestion_script: PathBuf,
    pub timeout: Duration,
}

impl PipelineConfig {
    /// Default script names inside `scripts_dir`, platform interpreter
    pub fn from_scripts_dir(scripts_dir: &Path) -> Self {
        Self {
            interpreter: default_interpreter().to_string(),
            ats_script: scripts_dir.join(ATS_SCRIPT_NAME),
            job_suggestion_script: scripts_dir.join(JOB_SUGGESTION_SCRIPT_NAME),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply `ANALYZER_INTERPRETER`, `ATS_SCRIPT` and `JOB_SUGGESTION_SCRIPT`.
    ///
    /// Pipelines run with the workspace as their working directory, so
    /// relative paths are anchored to `base_dir` here. A bare interpreter
    /// name is left alone for the `PATH` lookup.
    pub fn with_overrides<F>(mut self, lookup: F, base_dir: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(interpreter) = lookup("ANALYZER_INTERPRETER") {
            self.interpreter = if Path::new(&interpreter).components().count() > 1 {
                resolve_path(base_dir, PathBuf::from(interpreter))
                    .to_string_lossy()
                    .into_owned()
            } else {
                interpreter
            };
        }
        if let Some(script) = lookup("ATS_SCRIPT") {
            self.ats_script = resolve_path(base_dir, PathBuf::from(script));
        }
        if let Some(script) = lookup("JOB_SUGGESTION_SCRIPT") {
            self.job_suggestion_script = resolve_path(base_dir, PathBuf::from(script));
        }
        self
    }
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let pipeline = Self::load_pipeline(&environment.scripts_path)?;
        let port = parse_env("PORT", DEFAULT_PORT)?;

        info!(
            "Pipelines: {} {} / {} (timeout {:?})",
            pipeline.interpreter,
            pipeline.ats_script.display(),
            pipeline.job_suggestion_script.display(),
            pipeline.timeout
        );

        Ok(Self {
            environment,
            pipeline,
            port,
        })
    }

    /// Load pipeline configuration from environment variables
    fn load_pipeline(scripts_dir: &Path) -> Result<PipelineConfig> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        let mut pipeline = PipelineConfig::from_scripts_dir(scripts_dir)
            .with_overrides(|name| std::env::var(name).ok(), &base_dir);
        pipeline.timeout =
            Duration::from_secs(parse_env("PIPELINE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);

        Ok(pipeline)
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_dir_exists(&self.environment.workspace_path).await?;

        if let Some(db_parent) = self.environment.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::from_scripts_dir(Path::new("/opt/scripts"));
        assert_eq!(config.ats_script, PathBuf::from("/opt/scripts/ats_scorer.py"));
        assert_eq!(
            config.job_suggestion_script,
            PathBuf::from("/opt/scripts/job_suggestion.py")
        );
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.interpreter, default_interpreter());
    }

    #[test]
    fn test_relative_overrides_are_anchored() {
        let lookup = |name: &str| match name {
            "ATS_SCRIPT" => Some("python_scripts/ats_scorer.py".to_string()),
            "JOB_SUGGESTION_SCRIPT" => Some("/srv/jobs.py".to_string()),
            "ANALYZER_INTERPRETER" => Some("venv/bin/python".to_string()),
            _ => None,
        };

        let config = PipelineConfig::from_scripts_dir(Path::new("/opt/scripts"))
            .with_overrides(lookup, Path::new("/app"));

        assert_eq!(
            config.ats_script,
            PathBuf::from("/app/python_scripts/ats_scorer.py")
        );
        assert_eq!(config.job_suggestion_script, PathBuf::from("/srv/jobs.py"));
        assert_eq!(
            PathBuf::from(&config.interpreter),
            PathBuf::from("/app/venv/bin/python")
        );
    }

    #[test]
    fn test_bare_interpreter_name_is_kept() {
        let lookup = |name: &str| (name == "ANALYZER_INTERPRETER").then(|| "python3.12".to_string());

        let config = PipelineConfig::from_scripts_dir(Path::new("/opt/scripts"))
            .with_overrides(lookup, Path::new("/app"));

        assert_eq!(config.interpreter, "python3.12");
        assert_eq!(config.ats_script, PathBuf::from("/opt/scripts/ats_scorer.py"));
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u64 = parse_env("RESUME_ANALYZER_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
