// src/core/database.rs
//! Storage of analyzed resumes

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use crate::core::FsOps;
use crate::types::AnalysisResult;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn resumes(&self) -> ResumeRepository<'_> {
        ResumeRepository::new(&self.pool)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                data BLOB NOT NULL,
                ats_score REAL,
                analysis TEXT NOT NULL,
                upload_date TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create resumes table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_resumes_upload_date ON resumes(upload_date);")
            .execute(&self.pool)
            .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// History row, without the stored file bytes
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ResumeSummary {
    pub id: i64,
    pub filename: String,
    pub ats_score: Option<f64>,
    pub upload_date: DateTime<Utc>,
}

pub struct ResumeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResumeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store one analyzed upload and return its id
    pub async fn save(&self, filename: &str, data: &[u8], analysis: &AnalysisResult) -> Result<i64> {
        let analysis_json =
            serde_json::to_string(analysis).context("Failed to serialize analysis")?;

        let result = sqlx::query(
            r#"
            INSERT INTO resumes (filename, data, ats_score, analysis, upload_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(filename)
        .bind(data)
        .bind(analysis.ats_score())
        .bind(analysis_json)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .context("Failed to save resume")?;

        let id = result.last_insert_rowid();
        info!("Resume saved to database: {} (id {})", filename, id);
        Ok(id)
    }

    /// Newest first
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ResumeSummary>> {
        let rows = sqlx::query_as::<_, ResumeSummary>(
            r#"
            SELECT id, filename, ats_score, upload_date
            FROM resumes
            ORDER BY upload_date DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .context("Failed to list resumes")?;

        Ok(rows)
    }

    pub async fn find_analysis(&self, id: i64) -> Result<Option<AnalysisResult>> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT analysis FROM resumes WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .context("Failed to load resume analysis")?;

        stored
            .map(|text| {
                serde_json::from_str::<AnalysisResult>(&text)
                    .with_context(|| format!("Stored analysis for resume {} is corrupted", id))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(score: f64) -> AnalysisResult {
        AnalysisResult::from_value(json!({
            "atsScore": score,
            "recommendations": ["Add metrics to achievements."],
            "job_suggestions": [{"title": "Backend Engineer"}],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("nested/resumes.db")).await.unwrap();

        let id = db
            .resumes()
            .save("jane_doe.pdf", b"%PDF-1.7", &analysis(88.0))
            .await
            .unwrap();

        let stored = db.resumes().find_analysis(id).await.unwrap().unwrap();
        assert_eq!(stored, analysis(88.0));
        assert!(db.resumes().find_analysis(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("resumes.db")).await.unwrap();

        let first = db.resumes().save("a.pdf", b"a", &analysis(60.0)).await.unwrap();
        let second = db.resumes().save("b.docx", b"b", &analysis(70.0)).await.unwrap();
        let third = db.resumes().save("c.doc", b"c", &analysis(80.0)).await.unwrap();

        let recent = db.resumes().list_recent(2).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third, second]);
        assert_eq!(recent[0].filename, "c.doc");
        assert_eq!(recent[0].ats_score, Some(80.0));
        assert!(!ids.contains(&first));
    }

    #[tokio::test]
    async fn test_missing_score_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("resumes.db")).await.unwrap();

        let no_score = AnalysisResult::from_value(json!({"summary": "n/a"})).unwrap();
        db.resumes().save("cv.pdf", b"x", &no_score).await.unwrap();

        let recent = db.resumes().list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].ats_score, None);
    }
}
