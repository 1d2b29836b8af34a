#![allow(dead_code)]

use resume_analyzer::{AnalysisCoordinator, PipelineConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const RESUME_BYTES: &[u8] = b"%PDF-1.4 sample resume";

/// Scratch layout for one test: a scripts dir holding shell stand-ins for the
/// two pipelines and a workspace root for the temp directories.
pub struct Harness {
    dir: TempDir,
    pub scripts: PathBuf,
    pub workspaces: PathBuf,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let scripts = dir.path().join("scripts");
        let workspaces = dir.path().join("workspaces");
        std::fs::create_dir_all(&scripts).expect("scripts dir");

        Self {
            dir,
            scripts,
            workspaces,
        }
    }

    pub fn pipelines(&self) -> PipelineConfig {
        PipelineConfig::from_scripts_dir(&self.scripts)
            .with_interpreter("sh")
            .with_timeout(Duration::from_secs(10))
    }

    pub fn write_ats_script(&self, body: &str) {
        write_script(&self.pipelines().ats_script, body);
    }

    pub fn write_suggestion_script(&self, body: &str) {
        write_script(&self.pipelines().job_suggestion_script, body);
    }

    pub fn coordinator(&self) -> AnalysisCoordinator {
        AnalysisCoordinator::new(self.workspaces.clone(), &self.pipelines())
    }

    pub fn coordinator_with_timeout(&self, timeout: Duration) -> AnalysisCoordinator {
        AnalysisCoordinator::new(
            self.workspaces.clone(),
            &self.pipelines().with_timeout(timeout),
        )
    }

    pub fn database_path(&self) -> PathBuf {
        self.dir.path().join("data").join("resumes.db")
    }

    /// Entries left under the workspace root
    pub fn leftovers(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.workspaces) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write script");
}

/// Primary stand-in that echoes its location and role arguments
pub const ECHO_ATS: &str = r#"
printf '{"atsScore": 91, "keywordScore": 77, "location": "%s", "role": "%s"}' "$3" "$4"
"#;

/// Suggestion stand-in returning one job at the requested location
pub const ECHO_SUGGESTIONS: &str = r#"
printf '[{"title": "Rust Developer", "company": "Acme", "location": "%s", "salary": "n/a", "url": "https://acme.test/jobs/1"}]' "$2"
"#;
