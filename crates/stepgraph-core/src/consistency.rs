//! Consistency checks over annotated recordings.
//!
//! The checker audits a mostly-fixed historical dataset. It never raises and
//! never repairs: every finding is logged and returned as a [`Violation`] so
//! callers can triage it.
//!
//! Checks:
//!
//! - **timestamp ordering**: observed steps must start no earlier than the
//!   previous observed step and end after they start; near-identical
//!   timestamps are only accepted where two actions were done at once;
//! - **missing-step coupling**: `-1` timestamps and a `Missing Step` tag must
//!   go together;
//! - **order-error support**: an `Order Error` should coincide with some
//!   missing step just before or after the annotated step;
//! - **alignment**: after alignment every `(id, description)` pair must match
//!   the recipe and ids must not repeat unless known to.

use std::collections::BTreeMap;

use log::{error, warn};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    curation::ExceptionSource,
    graph::RecipeGraph,
    models::{ErrorTag, RecordedStep, Recording},
    reachability::missing_steps,
};

/// Timestamps whose summed start/end difference is below this are near
/// duplicates.
pub const NEAR_DUPLICATE_SECONDS: f64 = 2.0;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Known annotation imperfection; processing continues
    Warning,
    /// Broken alignment invariant that needs manual triage
    Error,
}

/// Kind of consistency finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    NearDuplicateTimestamp,
    UnorderedTimestamp,
    UntaggedMissingStep,
    TimedMissingStep,
    UnsupportedOrderError,
    StepNotInRecipe,
    DescriptionMismatch,
    DuplicateStepId,
}

impl ViolationKind {
    pub fn severity(&self) -> Severity {
        match self {
            ViolationKind::StepNotInRecipe
            | ViolationKind::DescriptionMismatch
            | ViolationKind::DuplicateStepId => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::NearDuplicateTimestamp => "near-duplicate timestamp",
            ViolationKind::UnorderedTimestamp => "unordered timestamp",
            ViolationKind::UntaggedMissingStep => "untagged missing step",
            ViolationKind::TimedMissingStep => "timed missing step",
            ViolationKind::UnsupportedOrderError => "unsupported order error",
            ViolationKind::StepNotInRecipe => "step not in recipe",
            ViolationKind::DescriptionMismatch => "description mismatch",
            ViolationKind::DuplicateStepId => "duplicate step id",
        }
    }
}

/// One consistency finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Violation {
    pub recording_id: String,
    pub step_id: Option<i64>,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(
        recording_id: impl Into<String>,
        step_id: Option<i64>,
        kind: ViolationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recording_id: recording_id.into(),
            step_id,
            kind,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    fn log(self) -> Self {
        match self.severity() {
            Severity::Warning => warn!("[{}] {}", self.recording_id, self.message),
            Severity::Error => error!("[{}] {}", self.recording_id, self.message),
        }
        self
    }
}

/// Collected findings, e.g. for a whole dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditReport {
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity() == severity)
            .count()
    }

    /// Number of findings per kind.
    pub fn counts_by_kind(&self) -> BTreeMap<ViolationKind, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Runs the consistency checks against an exception allow-list.
pub struct ConsistencyChecker<'a> {
    exceptions: &'a dyn ExceptionSource,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(exceptions: &'a dyn ExceptionSource) -> Self {
        Self { exceptions }
    }

    /// Timestamp ordering and missing-step coupling plus the alignment
    /// invariants, for a sorted and aligned recording.
    pub fn audit(&self, graph: &RecipeGraph, recording: &Recording) -> Vec<Violation> {
        let mut violations = self.check_timestamps(recording);
        violations.extend(self.check_missing_annotations(recording));
        violations.extend(self.check_alignment(graph, recording));
        violations
    }

    /// Checks that observed steps are ordered by time.
    pub fn check_timestamps(&self, recording: &Recording) -> Vec<Violation> {
        let simultaneous = self
            .exceptions
            .allows_simultaneous(recording.activity_id, &recording.recording_id);
        let mut violations = Vec::new();
        let (mut prev_start, mut prev_end) = (0.0_f64, 0.0_f64);

        for step in recording
            .step_annotations
            .iter()
            .filter(|s| !s.is_missing_placeholder())
        {
            let diff = (step.start_time - prev_start).abs() + (step.end_time - prev_end).abs();
            if diff < NEAR_DUPLICATE_SECONDS && !simultaneous {
                violations.push(
                    Violation::new(
                        &recording.recording_id,
                        Some(step.step_id),
                        ViolationKind::NearDuplicateTimestamp,
                        format!(
                            "Very close timestamp for step {} [{}, {}] and previous [{}, {}]",
                            step.step_id, step.start_time, step.end_time, prev_start, prev_end
                        ),
                    )
                    .log(),
                );
            }

            if step.start_time >= prev_start && step.end_time > step.start_time {
                prev_start = step.start_time;
                prev_end = step.end_time;
            } else {
                violations.push(
                    Violation::new(
                        &recording.recording_id,
                        Some(step.step_id),
                        ViolationKind::UnorderedTimestamp,
                        format!(
                            "Timestamp of step {} [{}, {}] is not ordered after [{}, {}]",
                            step.step_id, step.start_time, step.end_time, prev_start, prev_end
                        ),
                    )
                    .log(),
                );
            }
        }

        violations
    }

    /// Checks that `-1` timestamps and `Missing Step` tags coincide.
    pub fn check_missing_annotations(&self, recording: &Recording) -> Vec<Violation> {
        let mut violations = Vec::new();
        for step in &recording.step_annotations {
            let tagged = step.has_error(&ErrorTag::MissingStep);
            let untimed = step.start_time == -1.0 && step.end_time == -1.0;

            if step.start_time == -1.0 && !(untimed && tagged) {
                violations.push(
                    Violation::new(
                        &recording.recording_id,
                        Some(step.step_id),
                        ViolationKind::UntaggedMissingStep,
                        format!(
                            "No missing step annotation for step {} with time == -1",
                            step.step_id
                        ),
                    )
                    .log(),
                );
            }
            if tagged && !untimed {
                violations.push(
                    Violation::new(
                        &recording.recording_id,
                        Some(step.step_id),
                        ViolationKind::TimedMissingStep,
                        format!("Timestamp != -1 for missing step {}", step.step_id),
                    )
                    .log(),
                );
            }
        }
        violations
    }

    /// Flags an order error with no missing step just before or after it.
    ///
    /// `previous_ids` are the ids passed before `step`.
    pub fn check_order_error(
        &self,
        graph: &RecipeGraph,
        recording_id: &str,
        step: &RecordedStep,
        previous_ids: &[i64],
    ) -> Option<Violation> {
        if !step.has_error(&ErrorTag::OrderError) {
            return None;
        }

        let missing_before = missing_steps(graph, previous_ids);
        let mut with_step = previous_ids.to_vec();
        with_step.push(step.step_id);
        let missing_after = missing_steps(graph, &with_step);

        if !missing_before.is_empty() || !missing_after.is_empty() {
            return None;
        }
        if self.exceptions.allows_order_error(recording_id, step.step_id) {
            return None;
        }

        Some(
            Violation::new(
                recording_id,
                Some(step.step_id),
                ViolationKind::UnsupportedOrderError,
                format!(
                    "Order error annotation w/o missing steps at step {}",
                    step.step_id
                ),
            )
            .log(),
        )
    }

    /// Checks aligned ids against the recipe.
    pub fn check_alignment(&self, graph: &RecipeGraph, recording: &Recording) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut by_id: BTreeMap<i64, Vec<&str>> = BTreeMap::new();

        for step in &recording.step_annotations {
            by_id
                .entry(step.step_id)
                .or_default()
                .push(step.description.as_str());

            match graph.description(step.step_id) {
                None => violations.push(
                    Violation::new(
                        &recording.recording_id,
                        Some(step.step_id),
                        ViolationKind::StepNotInRecipe,
                        format!("Step id {} not found in task graph", step.step_id),
                    )
                    .log(),
                ),
                Some(canonical) if canonical != step.description => violations.push(
                    Violation::new(
                        &recording.recording_id,
                        Some(step.step_id),
                        ViolationKind::DescriptionMismatch,
                        format!(
                            "Description of step id {} does not match: '{}' vs '{}'",
                            step.step_id, step.description, canonical
                        ),
                    )
                    .log(),
                ),
                Some(_) => {}
            }
        }

        for (step_id, descriptions) in by_id {
            let count = descriptions.len();
            if count < 2
                || self
                    .exceptions
                    .allows_repeat(&recording.recording_id, step_id, count)
                || (self.exceptions.allows_repeated_unique_steps()
                    && is_repeated_action(graph, &descriptions))
            {
                continue;
            }
            violations.push(
                Violation::new(
                    &recording.recording_id,
                    Some(step_id),
                    ViolationKind::DuplicateStepId,
                    format!("Step id {step_id} is shared by {count} annotated steps"),
                )
                .log(),
            );
        }

        violations
    }
}

/// Same description every time, and that description is unique in the
/// recipe: the action was simply performed more than once.
fn is_repeated_action(graph: &RecipeGraph, descriptions: &[&str]) -> bool {
    match descriptions.split_first() {
        Some((first, rest)) => {
            rest.iter().all(|d| d == first) && graph.ids_for_description(first).len() == 1
        }
        None => false,
    }
}
