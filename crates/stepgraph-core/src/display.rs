//! Display formatting for inference results and audit reports.
//!
//! All output is markdown so the CLI can render it richly in a terminal or
//! print it as plain text.
//!
//! - [`models`]: Display implementations for domain models
//! - [`collections`]: the [`StepList`] wrapper for next/missing results
//! - [`report`]: audit reports and example counts
//!
//! ```rust
//! use stepgraph_core::{display::StepList, models::Step};
//!
//! let empty = StepList::new("Next steps", vec![]);
//! assert!(format!("{empty}").contains("None."));
//!
//! let list = StepList::new("Next steps", vec![Step::new(2, "Steep-Steep tea")]);
//! assert!(format!("{list}").contains("- 2. Steep-Steep tea"));
//! ```

pub mod collections;
pub mod models;
pub mod report;

pub use collections::StepList;
pub use report::ExampleSummary;
