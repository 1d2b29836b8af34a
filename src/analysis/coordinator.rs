// src/analysis/coordinator.rs
use crate::analysis::fallback::{
    mock_job_suggestion_values, mock_result, DEFAULT_LOCATION, DEFAULT_ROLE,
};
use crate::core::config_manager::{ConfigManager, PipelineConfig};
use crate::error::{AnalysisError, PipelineFailure};
use crate::pipeline::{PipelineInvoker, PipelineOutcome};
use crate::types::{AnalysisRequest, AnalysisResult};
use crate::utils::{or_default, preview};
use crate::workspace::{Workspace, WorkspaceManager};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use uuid::Uuid;

/// Merged result plus a record of which pipelines had to fall back.
#[derive(Debug)]
pub struct AnalysisReport {
    pub request_id: Uuid,
    pub result: AnalysisResult,
    pub primary_failure: Option<PipelineFailure>,
    pub suggestion_failure: Option<PipelineFailure>,
    pub unexpected: Option<AnalysisError>,
}

impl AnalysisReport {
    pub fn used_fallback(&self) -> bool {
        self.primary_failure.is_some()
            || self.suggestion_failure.is_some()
            || self.unexpected.is_some()
    }
}

/// Merge of the two pipeline outcomes, before it is tied to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedOutcome {
    pub result: AnalysisResult,
    pub primary_failure: Option<PipelineFailure>,
    pub suggestion_failure: Option<PipelineFailure>,
}

pub struct AnalysisCoordinator {
    workspaces: WorkspaceManager,
    invoker: PipelineInvoker,
    ats_script: PathBuf,
    job_suggestion_script: PathBuf,
}

impl AnalysisCoordinator {
    pub fn new(workspace_root: impl Into<PathBuf>, pipelines: &PipelineConfig) -> Self {
        Self {
            workspaces: WorkspaceManager::new(workspace_root),
            invoker: PipelineInvoker::new(pipelines.interpreter.clone(), pipelines.timeout),
            ats_script: pipelines.ats_script.clone(),
            job_suggestion_script: pipelines.job_suggestion_script.clone(),
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self::new(config.environment.workspace_path.clone(), &config.pipeline)
    }

    pub fn invoker(&self) -> &PipelineInvoker {
        &self.invoker
    }

    pub fn workspace_root(&self) -> &Path {
        self.workspaces.base_dir()
    }

    /// Analyze one resume. Always answers: unexpected failures turn into the
    /// mock result for the request's location.
    pub async fn run(&self, request: AnalysisRequest) -> AnalysisResult {
        self.run_with_report(request).await.result
    }

    pub async fn run_with_report(&self, request: AnalysisRequest) -> AnalysisReport {
        let request_id = Uuid::new_v4();
        let location = request.location.clone();

        info!(
            request_id = %request_id,
            location = %location,
            role = %request.role,
            "Starting resume analysis (job description: {})",
            preview(&request.job_description, 50)
        );

        match self.try_run(request_id, request).await {
            Ok(merged) => {
                info!(request_id = %request_id, "Analysis complete");
                AnalysisReport {
                    request_id,
                    result: merged.result,
                    primary_failure: merged.primary_failure,
                    suggestion_failure: merged.suggestion_failure,
                    unexpected: None,
                }
            }
            Err(e) => {
                error!(
                    request_id = %request_id,
                    "Analysis failed, answering with default data: {}",
                    e
                );
                AnalysisReport {
                    request_id,
                    result: mock_result(&location),
                    primary_failure: None,
                    suggestion_failure: None,
                    unexpected: Some(e),
                }
            }
        }
    }

    async fn try_run(
        &self,
        request_id: Uuid,
        request: AnalysisRequest,
    ) -> Result<MergedOutcome, AnalysisError> {
        let AnalysisRequest {
            resume_bytes,
            job_description,
            location,
            role,
        } = request;

        let workspace = self
            .workspaces
            .acquire(request_id, &resume_bytes, &job_description)
            .await?;
        drop(resume_bytes);

        // Release must run whatever happens inside dispatch, panics included.
        let dispatched = AssertUnwindSafe(self.dispatch(&workspace, &location, &role))
            .catch_unwind()
            .await;

        self.workspaces.release(&workspace).await;

        dispatched.map_err(|payload| AnalysisError::Panicked(panic_message(payload)))
    }

    async fn dispatch(&self, workspace: &Workspace, location: &str, role: &str) -> MergedOutcome {
        let resume = workspace.resume_path().to_string_lossy().into_owned();
        let job_description = workspace
            .job_description_path()
            .to_string_lossy()
            .into_owned();
        let location_arg = or_default(location, DEFAULT_LOCATION).to_string();
        let role_arg = or_default(role, DEFAULT_ROLE).to_string();

        let primary_args = vec![
            resume.clone(),
            job_description,
            location_arg.clone(),
            role_arg.clone(),
        ];
        let suggestion_args = vec![resume, location_arg, role_arg];

        let (primary, suggestions) = tokio::join!(
            self.invoker.invoke(
                &self.ats_script,
                &primary_args,
                workspace,
                mock_result(location).into_value(),
            ),
            self.invoker.invoke(
                &self.job_suggestion_script,
                &suggestion_args,
                workspace,
                Value::Array(Vec::new()),
            )
        );

        merge_outcomes(primary, suggestions, location)
    }
}

/// Combine the two pipeline outcomes into the response contract.
///
/// The primary side falls back to the mock analysis, the suggestion side to
/// the mock suggestion list whenever it did not produce a non-empty list.
/// The two decisions are independent.
pub fn merge_outcomes(
    primary: PipelineOutcome,
    suggestions: PipelineOutcome,
    location: &str,
) -> MergedOutcome {
    let (mut result, primary_failure) = match primary {
        PipelineOutcome::Parsed(value) => match AnalysisResult::from_value(value) {
            Some(result) => (result, None),
            None => (
                mock_result(location),
                Some(PipelineFailure::ParseError(
                    "primary output is not a JSON object".to_string(),
                )),
            ),
        },
        PipelineOutcome::Fallback(value, failure) => (
            AnalysisResult::from_value(value).unwrap_or_else(|| mock_result(location)),
            Some(failure),
        ),
    };

    let (list, suggestion_failure) = match suggestions {
        PipelineOutcome::Parsed(Value::Array(list)) => (list, None),
        PipelineOutcome::Parsed(_) => (
            Vec::new(),
            Some(PipelineFailure::ParseError(
                "job suggestions output is not a JSON list".to_string(),
            )),
        ),
        PipelineOutcome::Fallback(_, failure) => (Vec::new(), Some(failure)),
    };

    if list.is_empty() {
        result.set_job_suggestions(mock_job_suggestion_values(location));
    } else {
        result.set_job_suggestions(list);
    }

    MergedOutcome {
        result,
        primary_failure,
        suggestion_failure,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn primary_json() -> Value {
        json!({
            "atsScore": 82.5,
            "keywordScore": 64,
            "recommendations": ["Review keyword usage."],
            "job_suggestions": [{"title": "stale"}],
        })
    }

    #[test]
    fn test_merge_both_parsed() {
        let jobs = json!([{"title": "Rust Developer", "location": "Berlin"}]);
        let merged = merge_outcomes(
            PipelineOutcome::Parsed(primary_json()),
            PipelineOutcome::Parsed(jobs.clone()),
            "Berlin",
        );

        assert_eq!(merged.primary_failure, None);
        assert_eq!(merged.suggestion_failure, None);
        assert_eq!(merged.result.ats_score(), Some(82.5));
        assert_eq!(Value::Array(merged.result.job_suggestions().to_vec()), jobs);
    }

    #[test]
    fn test_merge_primary_fallback_uses_mock_fields() {
        let failure = PipelineFailure::NonZeroExit { code: Some(1) };
        let merged = merge_outcomes(
            PipelineOutcome::Fallback(mock_result("Oslo").into_value(), failure.clone()),
            PipelineOutcome::Parsed(json!([{"title": "Real Job"}])),
            "Oslo",
        );

        assert_eq!(merged.primary_failure, Some(failure));
        assert_eq!(
            merged.result.primary_fields(),
            mock_result("Oslo").primary_fields()
        );
        assert_eq!(merged.result.job_suggestions(), &[json!({"title": "Real Job"})]);
    }

    #[test]
    fn test_merge_empty_suggestions_fall_back_to_mock_list() {
        let merged = merge_outcomes(
            PipelineOutcome::Parsed(primary_json()),
            PipelineOutcome::Parsed(json!([])),
            "Lyon",
        );

        assert_eq!(merged.suggestion_failure, None);
        assert_eq!(
            merged.result.job_suggestions(),
            mock_job_suggestion_values("Lyon").as_slice()
        );
    }

    #[test]
    fn test_merge_non_list_suggestions() {
        let merged = merge_outcomes(
            PipelineOutcome::Parsed(primary_json()),
            PipelineOutcome::Parsed(json!({"jobs": []})),
            "",
        );

        assert_eq!(
            merged.suggestion_failure.as_ref().map(PipelineFailure::kind),
            Some("parse_error")
        );
        assert_eq!(
            merged.result.job_suggestions(),
            mock_job_suggestion_values("Remote").as_slice()
        );
        assert_eq!(merged.result.ats_score(), Some(82.5));
    }

    #[test]
    fn test_merge_non_object_primary() {
        let merged = merge_outcomes(
            PipelineOutcome::Parsed(json!([1, 2, 3])),
            PipelineOutcome::Fallback(json!([]), PipelineFailure::ParseError("x".into())),
            "Remote",
        );

        assert_eq!(merged.result, mock_result("Remote"));
        assert_eq!(
            merged.primary_failure.as_ref().map(PipelineFailure::kind),
            Some("parse_error")
        );
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("bang".to_string())), "bang");
        assert_eq!(panic_message(Box::new(7_u8)), "unknown panic");
    }
}
