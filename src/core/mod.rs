// src/core/mod.rs
//! Shared services: configuration, storage and file system helpers

pub mod config_manager;
pub mod database;
pub mod fs_ops;

pub use config_manager::{ConfigManager, PipelineConfig};
pub use database::{Database, ResumeRepository, ResumeSummary};
pub use fs_ops::FsOps;
