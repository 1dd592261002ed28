//! Curation tables: manual disambiguation and exception allow-lists.
//!
//! Historical annotations need a handful of hand-maintained overrides. They
//! are data, not logic: the aligner and checker consult them through the
//! [`DisambiguationSource`] and [`ExceptionSource`] traits, and the tables
//! themselves are loaded from JSON so they can grow without code changes.
//!
//! ```json
//! {
//!   "step_id_offsets": {"2": 40},
//!   "disambiguation": {"2": {"7": [13, 8], "5": [7, 5, 5]}},
//!   "simultaneous_actions": {"activity_ids": [13], "recording_ids": ["5_3"]},
//!   "order_error_exceptions": [{"recording_id": "1_32", "step_id": 2}],
//!   "repeated_steps": [{"recording_id": "2_42", "step_id": 5, "count": 2}],
//!   "allow_repeated_unique_steps": true
//! }
//! ```
//!
//! Resolution order: an explicit path, then
//! `$XDG_CONFIG_HOME/stepgraph/curation.json`, then empty tables.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// File name looked up in the XDG config directories.
pub const CURATION_FILE_NAME: &str = "curation.json";

/// Lookup of ordered id queues for ambiguous step descriptions.
pub trait DisambiguationSource {
    /// Position of a raw annotated step id within its activity.
    fn position(&self, activity_id: i64, raw_step_id: i64) -> i64;

    /// Ids to assign, in order, to successive occurrences at a position.
    fn ids_for(&self, activity_id: i64, position: i64) -> Option<&[i64]>;
}

/// Lookup of known, accepted annotation irregularities.
pub trait ExceptionSource {
    /// Two actions performed at once, so near-identical timestamps are fine.
    fn allows_simultaneous(&self, activity_id: i64, recording_id: &str) -> bool;

    /// Order error annotated without a matching missing-step condition.
    fn allows_order_error(&self, recording_id: &str, step_id: i64) -> bool;

    /// Step id legitimately shared by `count` annotated steps.
    fn allows_repeat(&self, recording_id: &str, step_id: i64, count: usize) -> bool;

    /// Whether a shared id whose description is unique in the recipe is
    /// accepted as the same action performed more than once.
    fn allows_repeated_unique_steps(&self) -> bool {
        false
    }
}

/// Activities and recordings where two steps were performed simultaneously.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimultaneousActions {
    pub activity_ids: BTreeSet<i64>,
    pub recording_ids: BTreeSet<String>,
}

/// A `(recording, step)` pair exempt from a check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepException {
    pub recording_id: String,
    pub step_id: i64,
}

/// A step id shared by a known number of annotated steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepeatedStep {
    pub recording_id: String,
    pub step_id: i64,
    pub count: usize,
}

/// All curation tables, as loaded from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurationTables {
    /// `activity_id → offset`; position = raw step id − offset
    pub step_id_offsets: BTreeMap<i64, i64>,

    /// `activity_id → position → ids`
    pub disambiguation: BTreeMap<i64, BTreeMap<i64, Vec<i64>>>,

    pub simultaneous_actions: SimultaneousActions,

    pub order_error_exceptions: Vec<StepException>,

    pub repeated_steps: Vec<RepeatedStep>,

    pub allow_repeated_unique_steps: bool,
}

impl CurationTables {
    /// Reads tables from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| CoreError::file_system(path, e))?;
        let tables: Self = serde_json::from_str(&raw)?;
        info!("Loaded curation tables from {}", path.display());
        Ok(tables)
    }

    /// Loads from `explicit`, else the XDG config file, else empty tables.
    ///
    /// # Errors
    ///
    /// An explicit path that cannot be read or parsed is an error; an absent
    /// XDG file is not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) => Self::load(path),
            None => {
                debug!("No curation file found; using empty tables");
                Ok(Self::default())
            }
        }
    }

    /// The first existing `stepgraph/curation.json` in the XDG config dirs.
    pub fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("stepgraph").find_config_file(CURATION_FILE_NAME)
    }
}

impl DisambiguationSource for CurationTables {
    fn position(&self, activity_id: i64, raw_step_id: i64) -> i64 {
        raw_step_id - self.step_id_offsets.get(&activity_id).copied().unwrap_or(0)
    }

    fn ids_for(&self, activity_id: i64, position: i64) -> Option<&[i64]> {
        self.disambiguation
            .get(&activity_id)
            .and_then(|positions| positions.get(&position))
            .map(Vec::as_slice)
    }
}

impl ExceptionSource for CurationTables {
    fn allows_simultaneous(&self, activity_id: i64, recording_id: &str) -> bool {
        self.simultaneous_actions.activity_ids.contains(&activity_id)
            || self.simultaneous_actions.recording_ids.contains(recording_id)
    }

    fn allows_order_error(&self, recording_id: &str, step_id: i64) -> bool {
        self.order_error_exceptions
            .iter()
            .any(|e| e.recording_id == recording_id && e.step_id == step_id)
    }

    fn allows_repeat(&self, recording_id: &str, step_id: i64, count: usize) -> bool {
        self.repeated_steps
            .iter()
            .any(|r| r.recording_id == recording_id && r.step_id == step_id && r.count == count)
    }

    fn allows_repeated_unique_steps(&self) -> bool {
        self.allow_repeated_unique_steps
    }
}
