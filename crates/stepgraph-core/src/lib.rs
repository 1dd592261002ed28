//! Core library for the stepgraph annotation toolkit.
//!
//! This crate models procedural activities (recipes) as directed acyclic
//! graphs of steps and answers, for any set of already-performed steps,
//! which steps may come next and which were skipped. On top of that it
//! aligns human step annotations onto recipe step ids, audits the
//! annotations for consistency, and turns recordings into labeled examples.
//!
//! # Components
//!
//! - **Recipe graphs** ([`graph`]): validated DAGs with a start node `0`
//! - **Reachability** ([`reachability`]): [`next_steps`] and
//!   [`missing_steps`]
//! - **Traces** ([`trace`]): cut points with history and overlap flags
//! - **Alignment** ([`align`]): description-based id assignment
//! - **Consistency** ([`consistency`]): non-fatal annotation audits
//! - **Examples** ([`labeling`]): labeled question generation
//! - **Pipeline** ([`pipeline`]): all of the above per recording
//!
//! Domain models implement [`std::fmt::Display`] as markdown; the wrappers
//! in [`display`] format lists and reports for the CLI's terminal renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use stepgraph_core::{missing_steps, next_steps, RecipeGraph};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = RecipeGraph::new(
//!     [
//!         (0, "START"),
//!         (1, "Boil-Boil water"),
//!         (2, "Steep-Steep tea"),
//!         (3, "END"),
//!     ],
//!     [(0, 1), (1, 2), (2, 3)],
//! )?;
//!
//! let next = next_steps(&graph, &[1]);
//! assert_eq!(next[0].step_id, 2);
//!
//! // Steeping without boiling first skips step 1
//! let missing = missing_steps(&graph, &[2]);
//! assert_eq!(missing[0].step_id, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod align;
pub mod consistency;
pub mod curation;
pub mod display;
pub mod error;
pub mod graph;
pub mod labeling;
pub mod models;
pub mod pipeline;
pub mod reachability;
pub mod trace;

// Re-export commonly used types
pub use align::Aligner;
pub use consistency::{AuditReport, ConsistencyChecker, Severity, Violation, ViolationKind};
pub use curation::{CurationTables, DisambiguationSource, ExceptionSource};
pub use display::{ExampleSummary, StepList};
pub use error::{CoreError, Result};
pub use graph::{RecipeBook, RecipeGraph, RecipeSource};
pub use labeling::{ExampleGenerator, ExampleSet};
pub use models::{
    ErrorTag, ExampleType, LabeledExample, Payload, RecordedStep, Recording, Step, TraceStep,
};
pub use pipeline::{load_recordings, Pipeline, PipelineBuilder, PipelineOutput};
pub use reachability::{missing_steps, next_steps};
pub use trace::{OverlapPolicy, TraceBuilder, TracePoint};
