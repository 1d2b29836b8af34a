// src/utils.rs
use anyhow::Result;

pub const ALLOWED_RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Returns `value`, or `default` when the caller left it blank
pub fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Accepts the MIME types browsers send for PDF and Word uploads
pub fn is_resume_mime_type(mime: &str) -> bool {
    let mime = mime.split(';').next().unwrap_or("").trim().to_lowercase();
    mime == "application/pdf"
        || mime == "application/msword"
        || mime.contains("vnd.openxmlformats-officedocument.wordprocessingml.document")
}

/// Shorten free text for log lines
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut shortened: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        shortened.push_str("...");
    }
    shortened
}
