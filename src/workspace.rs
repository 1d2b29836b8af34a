// src/workspace.rs
use crate::core::FsOps;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const RESUME_FILE_NAME: &str = "resume.pdf";
pub const JOB_DESCRIPTION_FILE_NAME: &str = "job_description.txt";

/// Scratch directory owned by a single analysis request
#[derive(Debug, Clone)]
pub struct Workspace {
    request_id: Uuid,
    root: PathBuf,
    resume_path: PathBuf,
    job_description_path: PathBuf,
}

impl Workspace {
    fn new(base: &Path, request_id: Uuid) -> Self {
        let root = base.join(format!("temp_{}", request_id));
        Self {
            request_id,
            resume_path: root.join(RESUME_FILE_NAME),
            job_description_path: root.join(JOB_DESCRIPTION_FILE_NAME),
            root,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resume_path(&self) -> &Path {
        &self.resume_path
    }

    pub fn job_description_path(&self) -> &Path {
        &self.job_description_path
    }

    async fn materialize(&self, resume: &[u8], job_description: &str) -> Result<()> {
        FsOps::write_bytes_safe(&self.resume_path, resume)
            .await
            .context("Failed to save resume into workspace")?;
        FsOps::write_file_safe(&self.job_description_path, job_description)
            .await
            .context("Failed to save job description into workspace")?;
        Ok(())
    }
}

pub struct WorkspaceManager {
    base_dir: PathBuf,
}

impl WorkspaceManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create `temp_<request_id>` and write both pipeline inputs into it.
    ///
    /// Both files are fully written before this returns, so pipelines launched
    /// afterwards never observe a half-built workspace. A failed write releases
    /// whatever was created before the error is returned.
    pub async fn acquire(
        &self,
        request_id: Uuid,
        resume: &[u8],
        job_description: &str,
    ) -> Result<Workspace> {
        FsOps::ensure_dir_exists(&self.base_dir).await?;

        let workspace = Workspace::new(&self.base_dir, request_id);

        // create_dir rather than create_dir_all: an existing directory means a
        // request id collision and must not be shared.
        tokio::fs::create_dir(workspace.root())
            .await
            .with_context(|| {
                format!(
                    "Failed to create workspace directory: {}",
                    workspace.root().display()
                )
            })?;

        if let Err(e) = workspace.materialize(resume, job_description).await {
            self.release(&workspace).await;
            return Err(e);
        }

        info!(
            request_id = %request_id,
            "Workspace prepared at {}",
            workspace.root().display()
        );
        Ok(workspace)
    }

    /// Remove the workspace. Never fails: files a pipeline already removed are
    /// skipped and removal errors are only logged.
    pub async fn release(&self, workspace: &Workspace) {
        for file in [workspace.resume_path(), workspace.job_description_path()] {
            if let Err(e) = FsOps::remove_file_if_exists(file).await {
                warn!(
                    request_id = %workspace.request_id(),
                    "Failed to clean up workspace file: {:#}",
                    e
                );
            }
        }

        match FsOps::remove_dir_all(workspace.root()).await {
            Ok(_) => info!(request_id = %workspace.request_id(), "Workspace released"),
            Err(e) => warn!(
                request_id = %workspace.request_id(),
                "Failed to remove workspace: {:#}",
                e
            ),
        }
    }
}
