//! Command handlers and their clap argument structures.
//!
//! Each command's arguments stay in this layer; handlers translate them into
//! core calls and hand the resulting markdown to the [`TerminalRenderer`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use stepgraph_core::{
    load_recordings, missing_steps, next_steps, ExampleSummary, PipelineBuilder, RecipeGraph,
    StepList,
};

use crate::renderer::TerminalRenderer;

/// Query a recipe graph for a set of passed steps
#[derive(Args)]
pub struct QueryArgs {
    /// Recipe JSON file
    #[arg(short, long, help = "Recipe JSON file with steps and edges")]
    pub recipe: PathBuf,
    /// Comma-separated ids of the steps performed so far
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        help = "Comma-separated ids of the steps performed so far"
    )]
    pub passed: Vec<i64>,
}

/// Inputs shared by the dataset commands
#[derive(Args)]
pub struct DatasetArgs {
    /// Directory of recipe JSON files, one per activity
    #[arg(long, help = "Directory of recipe JSON files named after their activity")]
    pub recipes: PathBuf,
    /// Annotation file: a JSON list of recordings
    #[arg(long, help = "JSON file with the annotated recordings")]
    pub annotations: PathBuf,
}

/// Align recordings and report annotation problems
#[derive(Args)]
pub struct AuditArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

/// Generate labeled examples
#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Output JSON file for the examples
    #[arg(short, long, help = "File to write the examples to")]
    pub output: PathBuf,
    /// Also ask for the next step at the start of each recording
    #[arg(long, help = "Also ask for the next step at the start of each recording")]
    pub start_next: bool,
}

/// Runs commands against a renderer.
pub struct Cli {
    curation_file: Option<PathBuf>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(curation_file: Option<PathBuf>, renderer: TerminalRenderer) -> Self {
        Self {
            curation_file,
            renderer,
        }
    }

    pub fn next(&self, args: QueryArgs) -> Result<()> {
        let graph = load_graph(&args.recipe)?;
        let steps = next_steps(&graph, &args.passed);
        self.renderer
            .render(&StepList::new("Next steps", steps).to_string())
    }

    pub fn missing(&self, args: QueryArgs) -> Result<()> {
        let graph = load_graph(&args.recipe)?;
        let steps = missing_steps(&graph, &args.passed);
        self.renderer
            .render(&StepList::new("Missing steps", steps).to_string())
    }

    pub fn audit(&self, args: AuditArgs) -> Result<()> {
        let pipeline = self.builder(&args.dataset).build()?;
        let recordings = load_recordings(&args.dataset.annotations)
            .context("Failed to load annotations")?;
        let report = pipeline.audit(recordings)?;
        self.renderer.render(&report.to_string())
    }

    pub fn generate(&self, args: GenerateArgs) -> Result<()> {
        let pipeline = self
            .builder(&args.dataset)
            .include_start_next(args.start_next)
            .build()?;
        let recordings = load_recordings(&args.dataset.annotations)
            .context("Failed to load annotations")?;
        let output = pipeline.run(recordings)?;

        let json = serde_json::to_string_pretty(output.examples.as_slice())?;
        fs::write(&args.output, json)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
        info!(
            "Wrote {} examples to {}",
            output.examples.len(),
            args.output.display()
        );

        self.renderer
            .render(&ExampleSummary(output.examples.counts()).to_string())
    }

    pub fn schema(&self) -> Result<()> {
        let schema = schemars::schema_for!(stepgraph_core::LabeledExample);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn builder(&self, dataset: &DatasetArgs) -> PipelineBuilder {
        PipelineBuilder::new()
            .with_recipe_dir(&dataset.recipes)
            .with_curation_path(self.curation_file.as_ref())
    }
}

fn load_graph(path: &Path) -> Result<RecipeGraph> {
    RecipeGraph::load(path).with_context(|| format!("Failed to load recipe {}", path.display()))
}
