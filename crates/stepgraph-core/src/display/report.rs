//! Markdown rendering of audit reports and example counts.

use std::{collections::BTreeMap, fmt};

use crate::{
    consistency::{AuditReport, Severity},
    models::ExampleType,
};

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Audit report")?;
        writeln!(f)?;
        if self.is_empty() {
            return writeln!(f, "No violations found.");
        }

        writeln!(
            f,
            "- Errors: {}\n- Warnings: {}",
            self.count(Severity::Error),
            self.count(Severity::Warning)
        )?;
        for (kind, count) in self.counts_by_kind() {
            writeln!(f, "  - {kind}: {count}")?;
        }

        writeln!(f, "\n## Findings")?;
        writeln!(f)?;
        for violation in self.iter() {
            let step = violation
                .step_id
                .map(|id| format!(" step {id}"))
                .unwrap_or_default();
            writeln!(
                f,
                "- **{}**{} ({}): {}",
                violation.recording_id,
                step,
                violation.severity(),
                violation.message
            )?;
        }
        Ok(())
    }
}

/// Per-type totals of generated examples.
pub struct ExampleSummary(pub BTreeMap<ExampleType, usize>);

impl fmt::Display for ExampleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.0.values().sum();
        writeln!(f, "# Generated {total} examples")?;
        writeln!(f)?;
        for kind in ExampleType::ALL {
            let count = self.0.get(&kind).copied().unwrap_or(0);
            writeln!(f, "- {kind}: {count}")?;
        }
        Ok(())
    }
}
