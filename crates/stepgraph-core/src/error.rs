//! Error types for the stepgraph library.

use std::path::PathBuf;

use thiserror::Error;

/// Structural and input errors raised by graph construction, alignment and
/// example collection.
///
/// Data-quality findings in human annotations are not errors; they are
/// reported as [`crate::consistency::Violation`] values.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A recorded step's description does not occur in its recipe
    #[error("Description '{description}' in recording {recording_id} not found in recipe")]
    DescriptionNotFound {
        recording_id: String,
        description: String,
    },
    /// The recipe graph contains a cycle
    #[error("Recipe graph contains a cycle through steps {nodes:?}")]
    CyclicGraph { nodes: Vec<i64> },
    /// An edge refers to a step id with no description
    #[error("Step with ID {id} not found in recipe")]
    UnknownStep { id: i64 },
    /// A non-start step cannot be reached from the start node
    #[error("Step with ID {id} is not reachable from the start step")]
    UnreachableStep { id: i64 },
    /// The recipe has no start node `0`
    #[error("Recipe has no start step (ID 0)")]
    MissingStartNode,
    /// No recipe is registered for an activity
    #[error("No recipe found for activity '{name}'")]
    UnknownActivity { name: String },
    /// Two examples were produced with the same question id
    #[error("Duplicate example ID: {id}")]
    DuplicateExampleId { id: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> CoreError {
        CoreError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl CoreError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for stepgraph operations
pub type Result<T> = std::result::Result<T, CoreError>;
