// src/web/handlers/analysis_handlers.rs
//! Resume upload and analysis history

use crate::analysis::AnalysisCoordinator;
use crate::core::Database;
use crate::types::{AnalysisRequest, AnalysisResult};
use crate::utils::{is_resume_mime_type, validate_file_extension, ALLOWED_RESUME_EXTENSIONS};
use crate::web::types::{api_error, processing_error, ApiError, HistoryResponse, ResumeUploadForm};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

const HISTORY_LIMIT: i64 = 50;

pub async fn analyze_resume_handler(
    upload: Form<ResumeUploadForm<'_>>,
    coordinator: &State<AnalysisCoordinator>,
    database: &State<Database>,
) -> Result<Json<AnalysisResult>, ApiError> {
    info!("Received request to analyze resume");

    let upload = upload.into_inner();
    let file = match upload.resume.as_ref() {
        Some(file) if file.len() > 0 => file,
        _ => {
            return Err(api_error(
                Status::BadRequest,
                "No file uploaded",
                "Attach a PDF or Word document in the 'resume' field.",
            ))
        }
    };

    let filename = uploaded_filename(file);
    validate_upload(file, &filename)?;
    info!("File uploaded: {}", filename);

    let bytes = read_upload(file).await.map_err(|e| {
        error!("Failed to read uploaded file {}: {}", filename, e);
        processing_error()
    })?;

    let request = AnalysisRequest::new(bytes.clone())
        .with_job_description(upload.job_description.unwrap_or_default())
        .with_location(upload.location.unwrap_or_default())
        .with_role(upload.role.unwrap_or_default());

    let report = coordinator.run_with_report(request).await;
    if report.used_fallback() {
        warn!(
            request_id = %report.request_id,
            primary = report.primary_failure.as_ref().map(|f| f.kind()).unwrap_or("ok"),
            suggestions = report.suggestion_failure.as_ref().map(|f| f.kind()).unwrap_or("ok"),
            "Analysis answered with fallback data"
        );
    }

    database
        .resumes()
        .save(&filename, &bytes, &report.result)
        .await
        .map_err(|e| {
            error!("Failed to persist analysis for {}: {:#}", filename, e);
            processing_error()
        })?;

    Ok(Json(report.result))
}

pub async fn list_resumes_handler(
    database: &State<Database>,
) -> Result<Json<HistoryResponse>, ApiError> {
    match database.resumes().list_recent(HISTORY_LIMIT).await {
        Ok(resumes) => Ok(Json(HistoryResponse { resumes })),
        Err(e) => {
            error!("Failed to load resume history: {:#}", e);
            Err(api_error(
                Status::InternalServerError,
                "Error loading history",
                "The server could not load previous analyses.",
            ))
        }
    }
}

pub async fn get_resume_analysis_handler(
    id: i64,
    database: &State<Database>,
) -> Result<Json<AnalysisResult>, ApiError> {
    match database.resumes().find_analysis(id).await {
        Ok(Some(analysis)) => Ok(Json(analysis)),
        Ok(None) => Err(api_error(
            Status::NotFound,
            "Resume not found",
            "No analysis is stored under this id.",
        )),
        Err(e) => {
            error!("Failed to load analysis {}: {:#}", id, e);
            Err(api_error(
                Status::InternalServerError,
                "Error loading analysis",
                "The server could not load this analysis.",
            ))
        }
    }
}

fn uploaded_filename(file: &TempFile<'_>) -> String {
    file.raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(|raw| Path::new(raw).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Both the extension and the declared content type must name a PDF or
/// Word document.
fn validate_upload(file: &TempFile<'_>, filename: &str) -> Result<(), ApiError> {
    let mime_ok = file
        .content_type()
        .map(|ct| is_resume_mime_type(&ct.to_string()))
        .unwrap_or(false);

    if !mime_ok || validate_file_extension(filename, &ALLOWED_RESUME_EXTENSIONS).is_err() {
        warn!("Rejected upload {:?}", filename);
        return Err(api_error(
            Status::BadRequest,
            "Invalid file type",
            "Only PDF and Word documents are allowed",
        ));
    }

    Ok(())
}

async fn read_upload(file: &TempFile<'_>) -> std::io::Result<Vec<u8>> {
    let reader = file.open().await?;
    tokio::pin!(reader);

    let mut bytes = Vec::with_capacity(file.len() as usize);
    reader.read_to_end(&mut bytes).await?;
    Ok(bytes)
}
