//! Canonical step and trace-history step definitions.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::StepError;

/// Id of the implicit start node in every recipe graph.
pub const START_STEP_ID: i64 = 0;

/// Id carried by the synthetic start step prepended to each recording.
pub const SYNTHETIC_START_ID: i64 = -1;

/// Description of the structural sink node of a recipe.
pub const END_DESCRIPTION: &str = "END";

/// A canonical step of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Step {
    /// Step id within the recipe graph
    pub step_id: i64,

    /// Canonical description
    pub description: String,
}

impl Step {
    pub fn new(step_id: i64, description: impl Into<String>) -> Self {
        Self {
            step_id,
            description: description.into(),
        }
    }

    /// Whether this is the structural END sink.
    pub fn is_end(&self) -> bool {
        self.description == END_DESCRIPTION
    }
}

/// A step as it appears in an example's history or as its current step.
///
/// The description is the display description of the recorded step, so it
/// may differ from the canonical one when the annotator supplied a modified
/// description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TraceStep {
    pub step_id: i64,

    pub description: String,

    /// Error annotations copied from the recorded step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StepError>,
}

impl TraceStep {
    /// Whether any error other than the excluded tags is present.
    pub fn has_error_except(&self, excluded: &[super::ErrorTag]) -> bool {
        self.errors.iter().any(|e| !excluded.contains(&e.tag))
    }
}
