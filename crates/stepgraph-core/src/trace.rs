//! Execution trace builder.
//!
//! Walks the chronologically sorted steps of one recording and yields a
//! [`TracePoint`] for every step usable as a cut point: its effective window
//! end time, the history of steps before it, and whether a later step
//! overlaps the window.
//!
//! Filtering rules, applied in order:
//!
//! 1. missing-step placeholders are skipped and never enter the history;
//! 2. steps ending before [`MIN_END_TIME`] are skipped as unreliable;
//! 3. the start step yields a point but never enters the history.
//!
//! Overlapping points are kept in the history of later points; it is the
//! caller's job not to label them.
//!
//! The running history is an explicit [`History`] value local to one
//! [`TraceBuilder::build`] call, so independent recordings can be traced in
//! parallel.

use log::warn;

use crate::models::{RecordedStep, TraceStep};

/// Steps ending before this many seconds are skipped.
pub const MIN_END_TIME: f64 = 5.0;

/// Tolerance for later steps that start just before the window closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapPolicy {
    /// Seconds added to a later step's start
    pub margin: f64,
    /// Later steps shorter than this use a proportional offset instead
    pub short_duration: f64,
    /// Fraction of a short step's duration added to its start
    pub short_ratio: f64,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        Self {
            margin: 2.0,
            short_duration: 2.0,
            short_ratio: 0.9,
        }
    }
}

impl OverlapPolicy {
    /// Point after which a later step counts as having started.
    pub fn boundary(&self, later: &RecordedStep) -> f64 {
        let duration = later.duration();
        if duration < self.short_duration {
            later.start_time + duration * self.short_ratio
        } else {
            later.start_time + self.margin
        }
    }

    /// Whether `later` intersects the window `[0, window_end]`.
    ///
    /// The comparison is strict: a later step whose boundary lands exactly on
    /// the window end does not overlap.
    pub fn overlaps(&self, window_end: f64, later: &RecordedStep) -> bool {
        self.boundary(later).max(0.0) < window_end.min(later.end_time)
    }
}

/// One usable cut point of a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct TracePoint {
    /// Index of the step in the recording
    pub position: usize,
    /// Effective end time of the trimmed window, in seconds
    pub end_time: f64,
    /// History snapshot before this step
    pub previous_steps: Vec<TraceStep>,
    pub step: RecordedStep,
    pub is_overlapping: bool,
}

impl TracePoint {
    pub fn is_start(&self) -> bool {
        self.step.is_start()
    }

    pub fn previous_ids(&self) -> Vec<i64> {
        self.previous_steps.iter().map(|s| s.step_id).collect()
    }

    /// Previous ids plus the current step, i.e. the passed set at this cut.
    pub fn passed_ids(&self) -> Vec<i64> {
        let mut ids = self.previous_ids();
        if !self.is_start() {
            ids.push(self.step.step_id);
        }
        ids
    }

    pub fn current_step(&self) -> TraceStep {
        self.step.to_trace_step()
    }
}

/// Running state threaded through a single trace.
#[derive(Debug, Clone, Default)]
pub struct History {
    steps: Vec<TraceStep>,
    latest_end: Option<f64>,
}

impl History {
    /// Effective end for a step: never earlier than any accepted step so far.
    pub fn window_end(&self, end_time: f64) -> f64 {
        match self.latest_end {
            Some(latest) => latest.max(end_time),
            None => end_time,
        }
    }

    /// Records an accepted step. The start step only extends the window.
    pub fn accept(&mut self, step: &RecordedStep) {
        self.latest_end = Some(self.window_end(step.end_time));
        if !step.is_start() {
            self.steps.push(step.to_trace_step());
        }
    }

    pub fn snapshot(&self) -> Vec<TraceStep> {
        self.steps.clone()
    }
}

/// Builds trace points from a sorted recording.
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    policy: OverlapPolicy,
    min_end_time: f64,
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self {
            policy: OverlapPolicy::default(),
            min_end_time: MIN_END_TIME,
        }
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_min_end_time(mut self, seconds: f64) -> Self {
        self.min_end_time = seconds;
        self
    }

    fn is_usable(&self, step: &RecordedStep) -> bool {
        !step.is_missing_placeholder() && step.end_time >= self.min_end_time
    }

    /// Walks `steps` in order and returns one point per usable step.
    pub fn build(&self, steps: &[RecordedStep]) -> Vec<TracePoint> {
        let mut history = History::default();
        let mut points = Vec::new();

        for (position, step) in steps.iter().enumerate() {
            if step.is_missing_placeholder() {
                continue;
            }
            if step.end_time < self.min_end_time {
                if !step.is_start() {
                    warn!(
                        "Skipping step {} ending at {}s; too short to be a cut point",
                        step.step_id, step.end_time
                    );
                }
                continue;
            }

            let end_time = history.window_end(step.end_time);
            let is_overlapping = steps[position + 1..]
                .iter()
                .filter(|later| self.is_usable(later))
                .any(|later| self.policy.overlaps(end_time, later));

            points.push(TracePoint {
                position,
                end_time,
                previous_steps: history.snapshot(),
                step: step.clone(),
                is_overlapping,
            });
            history.accept(step);
        }

        points
    }
}

/// Formats seconds as `hh:mm:ss`, truncating fractions.
pub fn format_hhmmss(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    format!("{sign}{h:02}:{m:02}:{s:02}")
}
