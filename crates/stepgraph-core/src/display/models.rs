//! Display implementations for domain models.

use std::fmt;

use crate::{
    consistency::{Severity, ViolationKind},
    models::{ErrorTag, ExampleType, Step, TraceStep},
};

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.step_id, self.description)
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.step_id, self.description)?;
        if !self.errors.is_empty() {
            let tags: Vec<&str> = self.errors.iter().map(|e| e.tag.as_str()).collect();
            write!(f, " [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepError;

    #[test]
    fn test_trace_step_lists_error_tags() {
        let step = TraceStep {
            step_id: 4,
            description: "Pour-Pour water".to_string(),
            errors: vec![StepError::new(ErrorTag::TimingError, "too early")],
        };
        assert_eq!(step.to_string(), "4. Pour-Pour water [Timing Error]");
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::new(1, "Boil-Boil water").to_string(), "1. Boil-Boil water");
    }
}
