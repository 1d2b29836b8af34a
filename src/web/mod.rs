// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::analysis::AnalysisCoordinator;
use crate::core::{ConfigManager, Database};
use crate::types::AnalysisResult;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/analyze-resume", data = "<upload>")]
pub async fn analyze_resume(
    upload: Form<ResumeUploadForm<'_>>,
    coordinator: &State<AnalysisCoordinator>,
    database: &State<Database>,
) -> Result<Json<AnalysisResult>, ApiError> {
    handlers::analyze_resume_handler(upload, coordinator, database).await
}

#[get("/resumes")]
pub async fn list_resumes(database: &State<Database>) -> Result<Json<HistoryResponse>, ApiError> {
    handlers::list_resumes_handler(database).await
}

#[get("/resumes/<id>")]
pub async fn get_resume_analysis(
    id: i64,
    database: &State<Database>,
) -> Result<Json<AnalysisResult>, ApiError> {
    handlers::get_resume_analysis_handler(id, database).await
}

#[get("/test")]
pub async fn api_test() -> Json<MessageResponse> {
    handlers::test_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Invalid request format",
        "Send the resume as multipart/form-data in the 'resume' field.",
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Not found", "No such endpoint."))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "File too large",
        "Resumes are limited to 10MB.",
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Invalid request format",
        "The upload form could not be read.",
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Error analyzing resume",
        "The server encountered an error while processing your resume.",
    ))
}

/// Assemble the server without launching it
pub fn build_rocket(
    coordinator: AnalysisCoordinator,
    database: Database,
    port: u16,
) -> Rocket<Build> {
    let limits = Limits::default()
        .limit("file", 10.mebibytes())
        .limit("data-form", 11.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(coordinator)
        .manage(database)
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                analyze_resume,
                list_resumes,
                get_resume_analysis,
                api_test,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    config.ensure_directories().await?;

    let database = Database::new(&config.environment.database_path).await?;
    let coordinator = AnalysisCoordinator::from_config(&config);

    info!("Starting resume analysis API server");
    info!(
        "Workspaces: {}",
        config.environment.workspace_path.display()
    );
    info!("Database: {}", config.environment.database_path.display());
    info!("Server: http://0.0.0.0:{}", config.port);

    build_rocket(coordinator, database, config.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
