//! stepgraph CLI Application
//!
//! Command-line interface for recipe graph queries and annotation
//! processing.

mod args;
mod cli;
mod renderer;

use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        curation_file,
        no_color,
        command,
    } = Args::parse();

    let cli = Cli::new(curation_file, TerminalRenderer::new(!no_color));

    info!("stepgraph started");

    match command {
        Next(args) => cli.next(args),
        Missing(args) => cli.missing(args),
        Audit(args) => cli.audit(args),
        Generate(args) => cli.generate(args),
        Schema => cli.schema(),
    }
}
