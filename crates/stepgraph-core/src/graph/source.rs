//! Recipe sources and the per-activity recipe registry.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
    sync::Arc,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::RecipeGraph;
use crate::{
    error::{CoreError, Result},
    models::recording::normalize_activity_name,
};

/// Serialized form of a recipe: `{steps: {"id": description}, edges: [[u, v]]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeSource {
    pub steps: BTreeMap<String, String>,

    #[serde(default)]
    pub edges: Vec<(i64, i64)>,
}

impl RecipeSource {
    /// Reads a recipe source from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| CoreError::file_system(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Validates the source into a graph.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for non-integer step keys, plus any
    /// error raised by [`RecipeGraph::new`].
    pub fn into_graph(self) -> Result<RecipeGraph> {
        let steps = self
            .steps
            .into_iter()
            .map(|(key, description)| {
                key.trim()
                    .parse::<i64>()
                    .map(|id| (id, description))
                    .map_err(|_| {
                        CoreError::invalid_input("steps")
                            .with_reason(format!("step key '{key}' is not an integer"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        RecipeGraph::new(steps, self.edges)
    }
}

impl RecipeGraph {
    /// Loads and validates a single recipe file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        RecipeSource::load(path)?.into_graph()
    }
}

/// Recipes keyed by normalized activity name.
///
/// Graphs are shared read-only between every recording of an activity.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<String, Arc<RecipeGraph>>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` recipe in a directory, keyed by file stem.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable or structurally invalid recipe; a bad
    /// recipe aborts loading instead of being skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| CoreError::file_system(dir, e))?;

        let mut book = Self::new();
        for entry in entries {
            let path = entry.map_err(|e| CoreError::file_system(dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            debug!("Loading recipe {}", path.display());
            let graph = RecipeGraph::load(&path)?;
            book.insert(stem, graph);
        }

        info!("Loaded {} recipes from {}", book.len(), dir.display());
        Ok(book)
    }

    /// Registers a graph under the normalized form of `name`.
    pub fn insert(&mut self, name: &str, graph: RecipeGraph) {
        self.recipes
            .insert(normalize_activity_name(name), Arc::new(graph));
    }

    /// Looks up a recipe by activity name, normalizing it first.
    pub fn get(&self, activity_name: &str) -> Option<Arc<RecipeGraph>> {
        self.recipes
            .get(&normalize_activity_name(activity_name))
            .cloned()
    }

    /// Like [`RecipeBook::get`] but treats a missing recipe as an error.
    pub fn require(&self, activity_name: &str) -> Result<Arc<RecipeGraph>> {
        self.get(activity_name)
            .ok_or_else(|| CoreError::UnknownActivity {
                name: activity_name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
