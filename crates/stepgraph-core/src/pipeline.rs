//! End-to-end processing of annotated recordings.
//!
//! The [`Pipeline`] ties the components together. For each recording:
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌─────────────┐   ┌─────────┐   ┌───────────┐
//! │  sort by │──▶│  align  │──▶│ consistency │──▶│  trace  │──▶│ examples  │
//! │   time   │   │   ids   │   │   checks    │   │ builder │   │ generator │
//! └──────────┘   └─────────┘   └─────────────┘   └─────────┘   └───────────┘
//! ```
//!
//! A recording with no recipe, or with a step description missing from its
//! recipe, aborts the run. Consistency findings never abort; they are
//! collected in the [`AuditReport`].
//!
//! Recordings share nothing but the read-only recipes and curation tables,
//! so [`Pipeline::process_recording`] may be called from several threads.

use std::{fs, path::Path};

use log::info;

use crate::{
    align::Aligner,
    consistency::{AuditReport, ConsistencyChecker, Violation},
    curation::CurationTables,
    error::{CoreError, Result},
    graph::RecipeBook,
    labeling::{ExampleGenerator, ExampleSet, RecordingContext},
    models::{LabeledExample, Recording},
    trace::TraceBuilder,
};

pub mod builder;

pub use builder::PipelineBuilder;

/// Reads a JSON list of recordings.
pub fn load_recordings(path: impl AsRef<Path>) -> Result<Vec<Recording>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| CoreError::file_system(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Result of processing one recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutcome {
    pub examples: Vec<LabeledExample>,
    pub violations: Vec<Violation>,
}

/// Result of processing a dataset.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub examples: ExampleSet,
    pub report: AuditReport,
}

/// Configured processing pipeline. Build one with [`PipelineBuilder`].
pub struct Pipeline {
    pub(crate) recipes: RecipeBook,
    pub(crate) curation: CurationTables,
    pub(crate) trace_builder: TraceBuilder,
    pub(crate) generator: ExampleGenerator,
}

impl Pipeline {
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn curation(&self) -> &CurationTables {
        &self.curation
    }

    /// Sorts and aligns a recording, returning it with its audit findings.
    ///
    /// A leading synthetic start step is dropped, so already-prepared files
    /// are accepted. Any other step with id `-1` is aligned by description.
    pub fn align_and_audit(&self, recording: Recording) -> Result<(Recording, Vec<Violation>)> {
        let graph = self.recipes.require(&recording.activity_name)?;
        let mut recording = recording.without_start_step();
        recording.sort_by_start_time();

        let aligned = Aligner::new(&self.curation).align_recording(&graph, recording)?;
        let violations = ConsistencyChecker::new(&self.curation).audit(&graph, &aligned);
        Ok((aligned, violations))
    }

    /// Runs the whole pipeline for one recording.
    ///
    /// # Errors
    ///
    /// - `CoreError::UnknownActivity` if no recipe matches the activity
    /// - `CoreError::DescriptionNotFound` if alignment fails
    pub fn process_recording(&self, recording: Recording) -> Result<RecordingOutcome> {
        let graph = self.recipes.require(&recording.activity_name)?;
        let (aligned, mut violations) = self.align_and_audit(recording)?;
        let prepared = aligned.with_start_step();

        let points = self.trace_builder.build(&prepared.step_annotations);

        let checker = ConsistencyChecker::new(&self.curation);
        violations.extend(points.iter().filter_map(|point| {
            checker.check_order_error(
                &graph,
                &prepared.recording_id,
                &point.step,
                &point.previous_ids(),
            )
        }));

        let ctx = RecordingContext {
            graph: &graph,
            recording_id: &prepared.recording_id,
            activity_name: &prepared.activity_name,
        };
        let examples = self.generator.generate(&ctx, &points);

        Ok(RecordingOutcome {
            examples,
            violations,
        })
    }

    /// Processes every recording in order.
    pub fn run(&self, recordings: Vec<Recording>) -> Result<PipelineOutput> {
        let mut output = PipelineOutput::default();
        for recording in recordings {
            let outcome = self.process_recording(recording)?;
            output.examples.extend(outcome.examples)?;
            output.report.extend(outcome.violations);
        }

        output.examples.validate_end_times();
        let counts: Vec<String> = output
            .examples
            .counts()
            .iter()
            .map(|(kind, n)| format!("{}: {n}", kind.as_str()))
            .collect();
        info!(
            "Total examples: {} ({}); {} findings",
            output.examples.len(),
            counts.join(", "),
            output.report.len()
        );
        Ok(output)
    }

    /// Aligns and audits recordings without generating examples.
    pub fn audit(&self, recordings: Vec<Recording>) -> Result<AuditReport> {
        let mut report = AuditReport::new();
        for recording in recordings {
            let (_, violations) = self.align_and_audit(recording)?;
            report.extend(violations);
        }
        Ok(report)
    }
}
