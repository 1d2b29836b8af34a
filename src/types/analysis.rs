// src/types/analysis.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JOB_SUGGESTIONS_FIELD: &str = "job_suggestions";
pub const ATS_SCORE_FIELD: &str = "atsScore";

/// Everything the caller hands over for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume_bytes: Vec<u8>,
    pub job_description: String,
    pub location: String,
    pub role: String,
}

impl AnalysisRequest {
    pub fn new(resume_bytes: Vec<u8>) -> Self {
        Self {
            resume_bytes,
            job_description: String::new(),
            location: String::new(),
            role: String::new(),
        }
    }

    pub fn with_job_description(mut self, job_description: impl Into<String>) -> Self {
        self.job_description = job_description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSuggestion {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub term: String,
    pub found: bool,
    pub frequency: u32,
}

/// Merged response handed back to the client.
///
/// The primary pipeline owns the shape of most fields, so the result is kept
/// as a JSON object and only the fields the orchestrator cares about get
/// typed accessors. Unknown fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts only JSON objects; anything else cannot carry the score fields.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn ats_score(&self) -> Option<f64> {
        self.0.get(ATS_SCORE_FIELD).and_then(Value::as_f64)
    }

    pub fn job_suggestions(&self) -> &[Value] {
        self.0
            .get(JOB_SUGGESTIONS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_job_suggestions(&mut self, suggestions: Vec<Value>) {
        self.0
            .insert(JOB_SUGGESTIONS_FIELD.to_string(), Value::Array(suggestions));
    }

    pub fn with_job_suggestions(mut self, suggestions: Vec<Value>) -> Self {
        self.set_job_suggestions(suggestions);
        self
    }

    /// Copy of the result without the suggestion list, i.e. the primary
    /// pipeline's contribution.
    pub fn primary_fields(&self) -> Map<String, Value> {
        let mut fields = self.0.clone();
        fields.remove(JOB_SUGGESTIONS_FIELD);
        fields
    }
}
