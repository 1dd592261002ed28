//! Recorded step model: one annotated step of a recording.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ErrorTag, TraceStep, START_STEP_ID, SYNTHETIC_START_ID};

/// One error annotation attached to a recorded step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepError {
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub tag: ErrorTag,

    #[serde(default)]
    pub description: String,
}

impl StepError {
    pub fn new(tag: ErrorTag, description: impl Into<String>) -> Self {
        Self {
            tag,
            description: description.into(),
        }
    }
}

/// A step as annotated in a recording.
///
/// Times are in seconds; `-1` means no observed timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedStep {
    /// Step id; raw annotation id before alignment, recipe id after
    pub step_id: i64,

    pub description: String,

    pub start_time: f64,

    pub end_time: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StepError>,

    /// Annotator-supplied description overriding `description` for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_description: Option<String>,
}

impl RecordedStep {
    pub fn new(step_id: i64, description: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            step_id,
            description: description.into(),
            start_time,
            end_time,
            errors: Vec::new(),
            modified_description: None,
        }
    }

    pub fn with_error(mut self, tag: ErrorTag, description: impl Into<String>) -> Self {
        self.errors.push(StepError::new(tag, description));
        self
    }

    /// A step that was skipped rather than observed.
    ///
    /// Some skipped steps only carry `-1` timestamps and no error tag, so
    /// either signal is sufficient.
    pub fn is_missing_placeholder(&self) -> bool {
        self.end_time < 0.0 || self.has_error(&ErrorTag::MissingStep)
    }

    /// The synthetic start step (or a step already mapped onto the start node).
    pub fn is_start(&self) -> bool {
        self.step_id == SYNTHETIC_START_ID || self.step_id == START_STEP_ID
    }

    pub fn has_error(&self, tag: &ErrorTag) -> bool {
        self.errors.iter().any(|e| &e.tag == tag)
    }

    /// The last error annotation with the given tag.
    pub fn error(&self, tag: &ErrorTag) -> Option<&StepError> {
        self.errors.iter().rev().find(|e| &e.tag == tag)
    }

    pub fn display_description(&self) -> &str {
        self.modified_description
            .as_deref()
            .unwrap_or(&self.description)
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn to_trace_step(&self) -> TraceStep {
        TraceStep {
            step_id: self.step_id,
            description: self.display_description().to_string(),
            errors: self.errors.clone(),
        }
    }
}
