// src/analysis/mod.rs
//! Orchestration of the two scoring pipelines for one resume

pub mod coordinator;
pub mod fallback;

pub use coordinator::{merge_outcomes, AnalysisCoordinator, AnalysisReport, MergedOutcome};
pub use fallback::{mock_job_suggestions, mock_result};
