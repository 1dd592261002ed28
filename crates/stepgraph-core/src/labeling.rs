//! Labeled example generation from trace points.
//!
//! Every non-overlapping, non-start trace point yields a `next` and a
//! `missing` question, plus one question per error type annotated on the
//! current step. Question ids repeat when a recording performs the same step
//! twice; only the first occurrence is kept.

use std::collections::{BTreeMap, HashSet};

use log::{debug, error};

use crate::{
    error::{CoreError, Result},
    graph::RecipeGraph,
    models::{ErrorTag, ExampleType, LabeledExample, Payload, RecordedStep, TraceStep},
    reachability::{missing_steps, next_steps},
    trace::{format_hhmmss, TracePoint},
};

/// Error description for a question type, or the canned "no error" text.
pub fn error_description(step: &RecordedStep, tag: &ErrorTag) -> String {
    match step.error(tag) {
        Some(error) => error.description.clone(),
        None => format!("This step does not contain any {} errors.", tag.kind()),
    }
}

/// Tags ignored when deciding whether a question's history is noisy.
fn noise_exclusions(kind: ExampleType) -> &'static [ErrorTag] {
    match kind {
        ExampleType::Missing => &[ErrorTag::MissingStep],
        ExampleType::Order => &[ErrorTag::OrderError, ErrorTag::MissingStep],
        _ => &[],
    }
}

fn is_noisy(previous: &[TraceStep], kind: ExampleType) -> bool {
    let excluded = noise_exclusions(kind);
    previous.iter().any(|s| s.has_error_except(excluded))
}

/// Fixed context for generating one recording's examples.
pub struct RecordingContext<'a> {
    pub graph: &'a RecipeGraph,
    pub recording_id: &'a str,
    pub activity_name: &'a str,
}

/// Turns trace points into labeled examples.
#[derive(Debug, Clone, Default)]
pub struct ExampleGenerator {
    include_start_next: bool,
}

impl ExampleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit the `next` question at the start point, whose answer is
    /// the recipe's roots.
    pub fn with_start_next(mut self, enabled: bool) -> Self {
        self.include_start_next = enabled;
        self
    }

    /// Generates every example for one recording's trace.
    pub fn generate(&self, ctx: &RecordingContext<'_>, points: &[TracePoint]) -> Vec<LabeledExample> {
        let mut seen = HashSet::new();
        let mut examples = Vec::new();

        for point in points.iter().filter(|p| !p.is_overlapping) {
            let kinds: &[ExampleType] = if point.is_start() {
                if self.include_start_next {
                    &[ExampleType::Next]
                } else {
                    &[]
                }
            } else {
                &ExampleType::ALL
            };

            for kind in kinds {
                let Some(payload) = self.payload(ctx.graph, point, *kind) else {
                    continue;
                };
                let example = build_example(ctx, point, payload);
                if !seen.insert(example.question_id.clone()) {
                    debug!("Duplicate question skipped: {}", example.question_id);
                    continue;
                }
                examples.push(example);
            }
        }

        examples
    }

    fn payload(&self, graph: &RecipeGraph, point: &TracePoint, kind: ExampleType) -> Option<Payload> {
        match kind {
            ExampleType::Next => Some(Payload::Next {
                next_steps: next_steps(graph, &point.passed_ids()),
            }),
            ExampleType::Missing => Some(Payload::Missing {
                missing_steps: missing_steps(graph, &point.passed_ids()),
            }),
            _ => {
                let tag = kind.error_tag()?;
                if !point.step.has_error(&tag) {
                    return None;
                }
                Payload::error(kind, error_description(&point.step, &tag))
            }
        }
    }
}

fn build_example(ctx: &RecordingContext<'_>, point: &TracePoint, payload: Payload) -> LabeledExample {
    let kind = payload.kind();
    let current_step = point.current_step();
    let example_id = format!("{}_{}", ctx.recording_id, current_step.step_id);
    LabeledExample {
        recording_id: ctx.recording_id.to_string(),
        question_id: format!("{example_id}_{}", kind.as_str()),
        example_id,
        end_time: format_hhmmss(point.end_time),
        activity_name: ctx.activity_name.to_string(),
        is_noisy: is_noisy(&point.previous_steps, kind),
        previous_steps: point.previous_steps.clone(),
        current_step,
        payload,
    }
}

/// Examples collected across recordings, unique by question id.
#[derive(Debug, Clone, Default)]
pub struct ExampleSet {
    examples: Vec<LabeledExample>,
    question_ids: HashSet<String>,
}

impl ExampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an example.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DuplicateExampleId` if the question id is taken,
    /// which means two recordings share a recording id.
    pub fn insert(&mut self, example: LabeledExample) -> Result<()> {
        if !self.question_ids.insert(example.question_id.clone()) {
            return Err(CoreError::DuplicateExampleId {
                id: example.question_id,
            });
        }
        self.examples.push(example);
        Ok(())
    }

    pub fn extend(&mut self, examples: impl IntoIterator<Item = LabeledExample>) -> Result<()> {
        examples.into_iter().try_for_each(|e| self.insert(e))
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    pub fn as_slice(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn into_vec(self) -> Vec<LabeledExample> {
        self.examples
    }

    /// Number of examples per question type.
    pub fn counts(&self) -> BTreeMap<ExampleType, usize> {
        let mut counts = BTreeMap::new();
        for example in &self.examples {
            *counts.entry(example.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Logs every example whose end time is negative or malformed and
    /// returns how many there were.
    pub fn validate_end_times(&self) -> usize {
        self.examples
            .iter()
            .filter(|e| match parse_hhmmss(&e.end_time) {
                Some(seconds) if seconds >= 0 => false,
                _ => {
                    error!("Invalid end time: {} {}", e.recording_id, e.end_time);
                    true
                }
            })
            .count()
    }
}

/// Parses `hh:mm:ss` (optionally signed) into seconds.
pub fn parse_hhmmss(value: &str) -> Option<i64> {
    let (sign, body) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value),
    };
    let parts: Vec<i64> = body
        .split(':')
        .map(|p| p.parse::<i64>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [h, m, s] => Some(sign * (h * 3600 + m * 60 + s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
