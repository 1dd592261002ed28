//! Builder for creating and configuring Pipeline instances.

use std::path::{Path, PathBuf};

use super::Pipeline;
use crate::{
    curation::CurationTables,
    error::{CoreError, Result},
    graph::RecipeBook,
    labeling::ExampleGenerator,
    trace::{OverlapPolicy, TraceBuilder},
};

/// Builder for creating and configuring Pipeline instances.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    recipe_dir: Option<PathBuf>,
    recipes: Option<RecipeBook>,
    curation_path: Option<PathBuf>,
    curation: Option<CurationTables>,
    include_start_next: bool,
    overlap_policy: OverlapPolicy,
}

impl PipelineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads recipes from every `*.json` file in a directory.
    pub fn with_recipe_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.recipe_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Uses an already-loaded recipe book; takes precedence over a directory.
    pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
        self.recipes = Some(recipes);
        self
    }

    /// Sets a custom curation file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_CONFIG_HOME/stepgraph/curation.json`, falling back to empty
    /// tables when that file does not exist.
    pub fn with_curation_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.curation_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses in-memory curation tables; takes precedence over any path.
    pub fn with_curation(mut self, tables: CurationTables) -> Self {
        self.curation = Some(tables);
        self
    }

    /// Emits the `next` question at each recording's start point.
    pub fn include_start_next(mut self, enabled: bool) -> Self {
        self.include_start_next = enabled;
        self
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Builds the configured pipeline.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if no recipes were configured, and
    /// propagates recipe and curation loading errors.
    pub fn build(self) -> Result<Pipeline> {
        let recipes = match (self.recipes, self.recipe_dir) {
            (Some(recipes), _) => recipes,
            (None, Some(dir)) => RecipeBook::load_dir(dir)?,
            (None, None) => {
                return Err(CoreError::Configuration {
                    message: "no recipes configured".to_string(),
                })
            }
        };

        let curation = match self.curation {
            Some(tables) => tables,
            None => CurationTables::resolve(self.curation_path.as_deref())?,
        };

        Ok(Pipeline {
            recipes,
            curation,
            trace_builder: TraceBuilder::new().with_policy(self.overlap_policy),
            generator: ExampleGenerator::new().with_start_next(self.include_start_next),
        })
    }
}
