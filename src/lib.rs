//! Resume analysis orchestrator
//!
//! Each upload is written into a private temp workspace, scored by two
//! external pipelines running concurrently, and merged into one
//! `AnalysisResult`. Pipeline failures degrade to deterministic default data
//! so a caller always gets a complete answer.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;
pub mod web;
pub mod workspace;

pub use analysis::{AnalysisCoordinator, AnalysisReport};
pub use crate::core::{ConfigManager, Database, PipelineConfig};
pub use error::{AnalysisError, PipelineFailure};
pub use pipeline::{PipelineInvoker, PipelineOutcome};
pub use types::{AnalysisRequest, AnalysisResult, JobSuggestion, KeywordMatch};
pub use web::start_web_server;
pub use workspace::{Workspace, WorkspaceManager};
