// src/pipeline/mod.rs
//! External scoring pipelines and the outcome of running one.

pub mod invoker;

pub use invoker::{default_interpreter, PipelineInvoker};

use crate::error::PipelineFailure;
use serde_json::Value;

/// Resolved result of one pipeline invocation. There is no pending state:
/// an invocation always ends in one of these two variants.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Parsed(Value),
    Fallback(Value, PipelineFailure),
}

impl PipelineOutcome {
    pub fn value(&self) -> &Value {
        match self {
            PipelineOutcome::Parsed(value) | PipelineOutcome::Fallback(value, _) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            PipelineOutcome::Parsed(value) | PipelineOutcome::Fallback(value, _) => value,
        }
    }

    pub fn failure(&self) -> Option<&PipelineFailure> {
        match self {
            PipelineOutcome::Parsed(_) => None,
            PipelineOutcome::Fallback(_, failure) => Some(failure),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PipelineOutcome::Fallback(..))
    }
}
