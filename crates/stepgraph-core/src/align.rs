//! Step-identity alignment of recorded steps onto recipe step ids.
//!
//! A recorded step's description is looked up among the recipe's canonical
//! descriptions:
//!
//! - exactly one match: the step takes that id;
//! - no match: fatal, the recording cannot be processed;
//! - several matches: a step whose id is already one of the matches keeps
//!   it, so aligned recordings pass through unchanged. Otherwise the step's
//!   position (raw id minus the activity offset) is looked up in the
//!   disambiguation table, and successive occurrences at that position
//!   consume the listed ids front to back. Positions without an entry keep
//!   their id.
//!
//! Queues are rebuilt for every recording, so one recording's consumption
//! never leaks into the next.

use std::collections::{HashMap, VecDeque};

use log::{error, warn};

use crate::{
    curation::DisambiguationSource,
    error::{CoreError, Result},
    graph::RecipeGraph,
    models::{RecordedStep, Recording},
};

/// Assigns recipe step ids to recorded steps.
pub struct Aligner<'a> {
    tables: &'a dyn DisambiguationSource,
}

impl<'a> Aligner<'a> {
    pub fn new(tables: &'a dyn DisambiguationSource) -> Self {
        Self { tables }
    }

    /// Returns a copy of the recording's steps with aligned ids.
    ///
    /// Neither the graph nor the recording is modified.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DescriptionNotFound` if a step's description is
    /// absent from the recipe.
    pub fn align(&self, graph: &RecipeGraph, recording: &Recording) -> Result<Vec<RecordedStep>> {
        let mut queues: HashMap<i64, VecDeque<i64>> = HashMap::new();

        recording
            .step_annotations
            .iter()
            .map(|step| {
                let mut aligned = step.clone();
                let candidates = graph.ids_for_description(&step.description);
                match candidates.as_slice() {
                    [] => {
                        error!(
                            "Step '{}' of recording {} not found in recipe",
                            step.description, recording.recording_id
                        );
                        return Err(CoreError::DescriptionNotFound {
                            recording_id: recording.recording_id.clone(),
                            description: step.description.clone(),
                        });
                    }
                    [id] => aligned.step_id = *id,
                    ids if ids.contains(&step.step_id) => {}
                    _ => {
                        let position = self.tables.position(recording.activity_id, step.step_id);
                        if let Some(id) = self.next_for(&mut queues, recording, position) {
                            aligned.step_id = id;
                        }
                    }
                }
                Ok(aligned)
            })
            .collect()
    }

    /// Consumes the next id queued for a position, if the table has one.
    fn next_for(
        &self,
        queues: &mut HashMap<i64, VecDeque<i64>>,
        recording: &Recording,
        position: i64,
    ) -> Option<i64> {
        let ids = self.tables.ids_for(recording.activity_id, position)?;
        let queue = queues
            .entry(position)
            .or_insert_with(|| ids.iter().copied().collect());
        let next = queue.pop_front();
        if next.is_none() {
            warn!(
                "Disambiguation ids for position {} exhausted in recording {}",
                position, recording.recording_id
            );
        }
        next
    }

    /// Aligns a recording in place of its original annotations.
    pub fn align_recording(&self, graph: &RecipeGraph, recording: Recording) -> Result<Recording> {
        let step_annotations = self.align(graph, &recording)?;
        Ok(Recording {
            step_annotations,
            ..recording
        })
    }
}
