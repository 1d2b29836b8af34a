// src/analysis/fallback.rs
//! Static stand-in results used whenever a pipeline cannot be trusted.
//!
//! Everything here is a pure function of the location so every fallback
//! branch in the coordinator produces the same, schema-complete payload.

use serde_json::{json, Map, Value};

use crate::types::{AnalysisResult, JobSuggestion, KeywordMatch};
use crate::utils::or_default;

pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_ROLE: &str = "General";

const MOCK_SCORES: [(&str, u32); 7] = [
    ("atsScore", 75),
    ("keywordScore", 80),
    ("skillScore", 70),
    ("experienceScore", 80),
    ("formattingScore", 90),
    ("grammarScore", 95),
    ("resumeLengthScore", 85),
];

const MOCK_RECOMMENDATIONS: [&str; 4] = [
    "Incorporate more industry-specific keywords from the job description",
    "Add measurable achievements to your experience section",
    "Ensure your resume uses a standard, ATS-friendly format",
    "Consider adding a skills section with relevant technical and soft skills",
];

/// Full substitute analysis for `location` (blank means `Remote`).
pub fn mock_result(location: &str) -> AnalysisResult {
    let mut fields = Map::new();

    for (name, score) in MOCK_SCORES {
        fields.insert(name.to_string(), json!(score));
    }

    fields.insert(
        "recommendations".to_string(),
        Value::Array(
            MOCK_RECOMMENDATIONS
                .iter()
                .map(|text| Value::String(text.to_string()))
                .collect(),
        ),
    );

    fields.insert(
        "keywordMatches".to_string(),
        Value::Array(to_values(&mock_keyword_matches())),
    );

    AnalysisResult::from_fields(fields).with_job_suggestions(mock_job_suggestion_values(location))
}

pub fn mock_keyword_matches() -> Vec<KeywordMatch> {
    [("javascript", 3), ("react", 2), ("node.js", 1)]
        .into_iter()
        .map(|(term, frequency)| KeywordMatch {
            term: term.to_string(),
            found: true,
            frequency,
        })
        .collect()
}

/// The two-entry suggestion list shared by both fallback paths.
pub fn mock_job_suggestions(location: &str) -> Vec<JobSuggestion> {
    let location = or_default(location, DEFAULT_LOCATION);

    vec![
        JobSuggestion {
            title: "Software Developer".to_string(),
            company: "Sample Company".to_string(),
            location: location.to_string(),
            salary: "$80,000 - $100,000".to_string(),
            url: "https://example.com".to_string(),
        },
        JobSuggestion {
            title: "Frontend Engineer".to_string(),
            company: "Tech Solutions Inc.".to_string(),
            location: location.to_string(),
            salary: "$90,000 - $110,000".to_string(),
            url: "https://example.com/job2".to_string(),
        },
    ]
}

pub fn mock_job_suggestion_values(location: &str) -> Vec<Value> {
    to_values(&mock_job_suggestions(location))
}

/// Plain string and integer fields, so serialization cannot fail.
fn to_values<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}
