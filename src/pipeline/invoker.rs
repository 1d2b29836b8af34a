// src/pipeline/invoker.rs
use crate::error::PipelineFailure;
use crate::pipeline::PipelineOutcome;
use crate::utils::preview;
use crate::workspace::Workspace;
use serde_json::Value;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// `python` on Windows, `python3` everywhere else
pub fn default_interpreter() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Runs one pipeline script per call and always resolves to an outcome.
///
/// A single attempt is made per call. Every failure mode (missing script,
/// spawn error, non-zero exit, unparsable stdout, timeout) is turned into
/// `PipelineOutcome::Fallback` carrying the value supplied by the caller.
pub struct PipelineInvoker {
    interpreter: String,
    timeout: Duration,
    spawned: AtomicUsize,
}

impl PipelineInvoker {
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
            spawned: AtomicUsize::new(0),
        }
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of processes this invoker has started
    pub fn spawn_count(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    pub async fn invoke(
        &self,
        script: &Path,
        args: &[String],
        workspace: &Workspace,
        fallback: Value,
    ) -> PipelineOutcome {
        let pipeline = pipeline_name(script);

        match self.execute(script, args, workspace, &pipeline).await {
            Ok(value) => {
                info!(
                    request_id = %workspace.request_id(),
                    pipeline = %pipeline,
                    "Pipeline produced a result"
                );
                PipelineOutcome::Parsed(value)
            }
            Err(failure) => {
                warn!(
                    request_id = %workspace.request_id(),
                    pipeline = %pipeline,
                    reason = failure.kind(),
                    "Falling back to default data: {}",
                    failure
                );
                PipelineOutcome::Fallback(fallback, failure)
            }
        }
    }

    async fn execute(
        &self,
        script: &Path,
        args: &[String],
        workspace: &Workspace,
        pipeline: &str,
    ) -> Result<Value, PipelineFailure> {
        // The child runs inside the workspace, so a relative path must be
        // anchored to our own working directory before it is checked or passed.
        let script = std::path::absolute(script).unwrap_or_else(|_| script.to_path_buf());

        if !tokio::fs::try_exists(&script).await.unwrap_or(false) {
            return Err(PipelineFailure::ScriptMissing { path: script });
        }

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&script)
            .args(args)
            .current_dir(workspace.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            "Executing: {} {} {}",
            self.interpreter,
            script.display(),
            args.join(" ")
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| PipelineFailure::SpawnError(e.to_string()))?;
        self.spawned.fetch_add(1, Ordering::SeqCst);

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let completion = async {
            let (stdout, stderr) = tokio::join!(read_stream(stdout), read_stream(stderr));
            let status = child.wait().await;
            (stdout, stderr, status)
        };
        let waited = tokio::time::timeout(self.timeout, completion).await;

        let (stdout, stderr, status) = match waited {
            Ok(finished) => finished,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!(pipeline = %pipeline, "Failed to kill timed out pipeline: {}", e);
                }
                return Err(PipelineFailure::TimedOut {
                    after: self.timeout,
                });
            }
        };

        let stderr = String::from_utf8_lossy(&stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!(pipeline = %pipeline, "stderr: {}", line);
        }

        let status: ExitStatus =
            status.map_err(|e| PipelineFailure::SpawnError(format!("wait failed: {}", e)))?;
        debug!(pipeline = %pipeline, "Process exited with {}", status);

        if !status.success() {
            if !stderr.trim().is_empty() {
                warn!(pipeline = %pipeline, "Pipeline error output: {}", stderr.trim());
            }
            return Err(PipelineFailure::NonZeroExit {
                code: status.code(),
            });
        }

        serde_json::from_slice::<Value>(&stdout).map_err(|e| {
            debug!(
                pipeline = %pipeline,
                "Raw output: {}",
                preview(&String::from_utf8_lossy(&stdout), 500)
            );
            PipelineFailure::ParseError(e.to_string())
        })
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> Vec<u8> {
    let mut buffer = Vec::new();
    if let Some(mut stream) = stream {
        if let Err(e) = stream.read_to_end(&mut buffer).await {
            warn!("Failed to read pipeline output: {}", e);
        }
    }
    buffer
}

fn pipeline_name(script: &Path) -> String {
    script
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceManager;
    use serde_json::json;
    use uuid::Uuid;

    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_pipeline_name() {
        assert_eq!(pipeline_name(Path::new("/x/ats_scorer.py")), "ats_scorer");
    }

    #[test]
    fn test_default_interpreter() {
        if cfg!(windows) {
            assert_eq!(default_interpreter(), "python");
        } else {
            assert_eq!(default_interpreter(), "python3");
        }
    }

    #[tokio::test]
    async fn test_parsed_output() {
        let scripts = tempfile::tempdir().unwrap();
        let base = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(base.path());
        let workspace = manager.acquire(Uuid::new_v4(), b"r", "").await.unwrap();

        let script = write_script(scripts.path(), "ok.sh", "echo '{\"score\": 5}'\n");
        let invoker = PipelineInvoker::new("sh", Duration::from_secs(10));

        let outcome = invoker.invoke(&script, &[], &workspace, json!(null)).await;
        assert_eq!(outcome, PipelineOutcome::Parsed(json!({"score": 5})));
        assert_eq!(invoker.spawn_count(), 1);

        manager.release(&workspace).await;
    }

    #[tokio::test]
    async fn test_relative_script_path_runs() {
        // a scripts dir under the current directory, addressed relatively
        let scripts = tempfile::tempdir_in(".").unwrap();
        let relative = Path::new(".").join(scripts.path().file_name().unwrap());
        let base = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(base.path());
        let workspace = manager.acquire(Uuid::new_v4(), b"r", "").await.unwrap();

        write_script(scripts.path(), "ats_scorer.sh", "echo '{\"atsScore\": 88}'\n");
        let script = relative.join("ats_scorer.sh");
        assert!(script.is_relative());

        let invoker = PipelineInvoker::new("sh", Duration::from_secs(10));
        let outcome = invoker.invoke(&script, &[], &workspace, json!({})).await;

        assert_eq!(outcome, PipelineOutcome::Parsed(json!({"atsScore": 88})));
        assert_eq!(invoker.spawn_count(), 1);

        manager.release(&workspace).await;
    }

    #[tokio::test]
    async fn test_unknown_interpreter_is_spawn_error() {
        let scripts = tempfile::tempdir().unwrap();
        let base = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(base.path());
        let workspace = manager.acquire(Uuid::new_v4(), b"r", "").await.unwrap();

        let script = write_script(scripts.path(), "ok.sh", "echo '{}'\n");
        let invoker = PipelineInvoker::new(
            "definitely-not-an-interpreter-4b1d",
            Duration::from_secs(10),
        );

        let outcome = invoker.invoke(&script, &[], &workspace, json!([])).await;
        assert!(matches!(
            outcome,
            PipelineOutcome::Fallback(_, PipelineFailure::SpawnError(_))
        ));
        assert_eq!(outcome.value(), &json!([]));
        assert_eq!(invoker.spawn_count(), 0);

        manager.release(&workspace).await;
    }
}
