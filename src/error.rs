// src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a pipeline's output was replaced by a fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineFailure {
    #[error("pipeline script not found at {}", .path.display())]
    ScriptMissing { path: PathBuf },

    #[error("failed to start pipeline process: {0}")]
    SpawnError(String),

    #[error("pipeline exited with status {}", exit_label(.code))]
    NonZeroExit { code: Option<i32> },

    #[error("pipeline output is not valid JSON: {0}")]
    ParseError(String),

    #[error("pipeline did not finish within {after:?}")]
    TimedOut { after: Duration },
}

impl PipelineFailure {
    /// Stable tag used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineFailure::ScriptMissing { .. } => "script_missing",
            PipelineFailure::SpawnError(_) => "spawn_error",
            PipelineFailure::NonZeroExit { .. } => "non_zero_exit",
            PipelineFailure::ParseError(_) => "parse_error",
            PipelineFailure::TimedOut { .. } => "timed_out",
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Failures of the coordinator itself, outside the modeled pipeline cases.
/// These never reach the caller; they collapse into the full mock result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("workspace provisioning failed: {0:#}")]
    Workspace(#[from] anyhow::Error),

    #[error("analysis task panicked: {0}")]
    Panicked(String),
}
