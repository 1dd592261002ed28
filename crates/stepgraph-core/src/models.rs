//! Data models for recipes, recordings and labeled examples.
//!
//! The canonical side of the domain is a [`Step`] (id + description) inside a
//! recipe graph. The observed side is a [`Recording`]: a list of
//! [`RecordedStep`] annotations with timestamps and optional error tags.
//! Inference over a recording produces [`LabeledExample`] records.
//!
//! Display implementations for these models live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use stepgraph_core::models::{ErrorTag, RecordedStep};
//!
//! let json = r#"{
//!     "step_id": 7,
//!     "description": "Add-Add salt",
//!     "start_time": -1,
//!     "end_time": -1,
//!     "errors": [{"tag": "Missing Step", "description": "Skipped this step"}]
//! }"#;
//! let step: RecordedStep = serde_json::from_str(json).unwrap();
//! assert!(step.is_missing_placeholder());
//! assert!(step.has_error(&ErrorTag::MissingStep));
//! ```

pub mod example;
pub mod recorded;
pub mod recording;
pub mod step;
pub mod tag;


pub use example::{ExampleType, LabeledExample, Payload};
pub use recorded::{RecordedStep, StepError};
pub use recording::Recording;
pub use step::{Step, TraceStep, END_DESCRIPTION, START_STEP_ID, SYNTHETIC_START_ID};
pub use tag::ErrorTag;
