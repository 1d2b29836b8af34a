// src/cli.rs
use crate::analysis::AnalysisCoordinator;
use crate::core::ConfigManager;
use crate::types::AnalysisRequest;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "Score resumes against job descriptions and suggest matching jobs")]
pub struct AnalyzerCli {
    #[command(subcommand)]
    pub command: Option<AnalyzerCommand>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AnalyzerCommand {
    /// Start the HTTP API (default)
    Serve,
    /// Analyze a single resume and print the result as JSON
    Analyze {
        /// Resume document (pdf, doc, docx)
        file: PathBuf,
        /// Text file holding the job description
        #[arg(long)]
        job_description: Option<PathBuf>,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        role: String,
    },
}

pub async fn handle_command(cli: AnalyzerCli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(AnalyzerCommand::Serve) {
        AnalyzerCommand::Serve => start_web_server(config).await,
        AnalyzerCommand::Analyze {
            file,
            job_description,
            location,
            role,
        } => {
            let request =
                build_request(file, job_description.as_ref(), location, role).await?;

            config.ensure_directories().await?;
            let coordinator = AnalysisCoordinator::from_config(&config);
            let report = coordinator.run_with_report(request).await;

            if report.used_fallback() {
                warn!(
                    request_id = %report.request_id,
                    "Some pipelines fell back to default data"
                );
            }

            let rendered = serde_json::to_string_pretty(&report.result)
                .context("Failed to serialize analysis result")?;
            println!("{}", rendered);
            Ok(())
        }
    }
}

async fn build_request(
    file: PathBuf,
    job_description: Option<&PathBuf>,
    location: String,
    role: String,
) -> Result<AnalysisRequest> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read resume {}", file.display()))?;
    info!("Loaded resume {} ({} bytes)", file.display(), bytes.len());

    let job_description = match job_description {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description {}", path.display()))?,
        None => String::new(),
    };

    Ok(AnalysisRequest::new(bytes)
        .with_job_description(job_description)
        .with_location(location)
        .with_role(role))
}
