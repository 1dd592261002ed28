//! Recording model: one annotated execution of a procedure.

use serde::{Deserialize, Serialize};

use super::{RecordedStep, SYNTHETIC_START_ID};

/// Description of the synthetic start step.
pub const START_DESCRIPTION: &str = "Start-Start cooking.";

/// One person's annotated execution of a procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recording {
    pub recording_id: String,

    pub activity_id: i64,

    pub activity_name: String,

    #[serde(default)]
    pub step_annotations: Vec<RecordedStep>,
}

/// Lowercase activity name with spaces removed; recipe files are keyed by it.
pub fn normalize_activity_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

impl Recording {
    pub fn normalized_activity_name(&self) -> String {
        normalize_activity_name(&self.activity_name)
    }

    /// Stable sort of the annotations by start time.
    ///
    /// Raw annotation order does not follow the timestamps.
    pub fn sort_by_start_time(&mut self) {
        self.step_annotations
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// Prepend the synthetic start step.
    ///
    /// The start step ends where the first timed step begins (0 when no step
    /// has a timestamp).
    pub fn with_start_step(mut self) -> Self {
        let end_time = self
            .step_annotations
            .iter()
            .map(|s| s.start_time)
            .find(|t| *t >= 0.0)
            .unwrap_or(0.0);
        let start = RecordedStep::new(SYNTHETIC_START_ID, START_DESCRIPTION, 0.0, end_time);
        self.step_annotations.insert(0, start);
        self
    }

    /// Whether the first annotation is the synthetic start step.
    ///
    /// Other steps may carry id `-1` too (unidentified), so the description
    /// has to match as well.
    pub fn has_start_step(&self) -> bool {
        self.step_annotations
            .first()
            .is_some_and(|s| {
                s.step_id == SYNTHETIC_START_ID && s.description == START_DESCRIPTION
            })
    }

    /// Drop a leading synthetic start step, if there is one.
    pub fn without_start_step(mut self) -> Self {
        if self.has_start_step() {
            self.step_annotations.remove(0);
        }
        self
    }
}
