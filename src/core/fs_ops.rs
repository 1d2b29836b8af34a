// src/core/fs_ops.rs
//! File system helpers shared by the workspace and configuration code

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Write text file
    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        Self::write_bytes_safe(path, content.as_bytes()).await
    }

    /// Write binary file
    pub async fn write_bytes_safe(path: &Path, content: &[u8]) -> Result<()> {
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        debug!("Written file: {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    /// Remove a file, treating an already missing file as success.
    /// Returns whether something was actually deleted.
    pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
        }
    }

    /// Remove directory recursively, missing directory is not an error
    pub async fn remove_dir_all(path: &Path) -> Result<bool> {
        match fs::remove_dir_all(path).await {
            Ok(()) => {
                debug!("Removed directory: {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove directory: {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let removed = FsOps::remove_file_if_exists(&dir.path().join("gone.txt"))
            .await
            .unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_write_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.bin");

        FsOps::ensure_dir_exists(path.parent().unwrap()).await.unwrap();
        FsOps::write_bytes_safe(&path, &[1, 2, 3]).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);

        assert!(FsOps::remove_file_if_exists(&path).await.unwrap());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_dir_all_twice() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("scratch");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("leftover.txt"), "x").unwrap();

        assert!(FsOps::remove_dir_all(&target).await.unwrap());
        assert!(!FsOps::remove_dir_all(&target).await.unwrap());
    }
}
