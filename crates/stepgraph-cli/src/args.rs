use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{AuditArgs, GenerateArgs, QueryArgs};

/// Command-line interface for stepgraph
///
/// stepgraph answers reachability questions over recipe task graphs (which
/// steps may come next, which were skipped) and turns annotated recordings
/// of those recipes into audited, labeled question/answer examples.
#[derive(Parser)]
#[command(version, about, name = "stepgraph")]
pub struct Args {
    /// Path to the curation tables JSON file. Defaults to
    /// $XDG_CONFIG_HOME/stepgraph/curation.json
    #[arg(long, global = true)]
    pub curation_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the stepgraph CLI
///
/// - `next` / `missing`: query a single recipe graph
/// - `audit`: align recordings and report annotation problems
/// - `generate`: write labeled examples for every recording
/// - `schema`: print the JSON schema of a labeled example
#[derive(Subcommand)]
pub enum Commands {
    /// Show the steps that may be performed next
    #[command(alias = "n")]
    Next(QueryArgs),
    /// Show the steps that were skipped
    #[command(alias = "m")]
    Missing(QueryArgs),
    /// Align recordings and check their annotations
    Audit(AuditArgs),
    /// Generate labeled examples from recordings
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Print the JSON schema of a labeled example
    Schema,
}
