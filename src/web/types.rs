// src/web/types.rs
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;

use crate::core::ResumeSummary;

/// Multipart body of `POST /api/analyze-resume`
#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub resume: Option<TempFile<'f>>,
    #[field(name = "jobDescription")]
    pub job_description: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

pub type ApiError = (Status, Json<ErrorResponse>);

pub fn api_error(status: Status, error: &str, message: &str) -> ApiError {
    (status, Json(ErrorResponse::new(error, message)))
}

pub fn processing_error() -> ApiError {
    api_error(
        Status::InternalServerError,
        "Error analyzing resume",
        "The server encountered an error while processing your resume.",
    )
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HistoryResponse {
    pub resumes: Vec<ResumeSummary>,
}
