//! Collection wrapper types for displaying groups of steps.

use std::fmt;

use crate::models::Step;

/// Titled list of steps, e.g. a next-step or missing-step result.
///
/// An empty list is a valid answer ("no next step") and renders as `None.`
pub struct StepList {
    pub title: String,
    pub steps: Vec<Step>,
}

impl StepList {
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            title: title.into(),
            steps,
        }
    }
}

impl fmt::Display for StepList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.title)?;
        writeln!(f)?;
        if self.steps.is_empty() {
            return writeln!(f, "None.");
        }
        for step in &self.steps {
            writeln!(f, "- {step}")?;
        }
        Ok(())
    }
}
