//! Labeled example model emitted for the prompt-assembly stage.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ErrorTag, Step, TraceStep};

/// Question type of a labeled example.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExampleType {
    Next,
    Missing,
    Order,
    Preparation,
    Measurement,
    Timing,
    Technique,
    Temperature,
}

impl ExampleType {
    /// Every type, in emission order.
    pub const ALL: [ExampleType; 8] = [
        ExampleType::Next,
        ExampleType::Missing,
        ExampleType::Order,
        ExampleType::Preparation,
        ExampleType::Measurement,
        ExampleType::Timing,
        ExampleType::Technique,
        ExampleType::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleType::Next => "next",
            ExampleType::Missing => "missing",
            ExampleType::Order => "order",
            ExampleType::Preparation => "preparation",
            ExampleType::Measurement => "measurement",
            ExampleType::Timing => "timing",
            ExampleType::Technique => "technique",
            ExampleType::Temperature => "temperature",
        }
    }

    /// The annotation tag an error-type question is generated from.
    pub fn error_tag(&self) -> Option<ErrorTag> {
        match self {
            ExampleType::Next | ExampleType::Missing => None,
            ExampleType::Order => Some(ErrorTag::OrderError),
            ExampleType::Preparation => Some(ErrorTag::PreparationError),
            ExampleType::Measurement => Some(ErrorTag::MeasurementError),
            ExampleType::Timing => Some(ErrorTag::TimingError),
            ExampleType::Technique => Some(ErrorTag::TechniqueError),
            ExampleType::Temperature => Some(ErrorTag::TemperatureError),
        }
    }
}

impl FromStr for ExampleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExampleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid example type: {s}"))
    }
}

/// Type-specific answer of a labeled example.
///
/// Serialized inline with the example, discriminated by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Next { next_steps: Vec<Step> },
    Missing { missing_steps: Vec<Step> },
    Order { error_description: String },
    Preparation { error_description: String },
    Measurement { error_description: String },
    Timing { error_description: String },
    Technique { error_description: String },
    Temperature { error_description: String },
}

impl Payload {
    /// Build the error-description payload for an error question type.
    ///
    /// Returns `None` for `next` and `missing`, which carry step lists.
    pub fn error(kind: ExampleType, error_description: String) -> Option<Self> {
        let payload = match kind {
            ExampleType::Next | ExampleType::Missing => return None,
            ExampleType::Order => Payload::Order { error_description },
            ExampleType::Preparation => Payload::Preparation { error_description },
            ExampleType::Measurement => Payload::Measurement { error_description },
            ExampleType::Timing => Payload::Timing { error_description },
            ExampleType::Technique => Payload::Technique { error_description },
            ExampleType::Temperature => Payload::Temperature { error_description },
        };
        Some(payload)
    }

    pub fn kind(&self) -> ExampleType {
        match self {
            Payload::Next { .. } => ExampleType::Next,
            Payload::Missing { .. } => ExampleType::Missing,
            Payload::Order { .. } => ExampleType::Order,
            Payload::Preparation { .. } => ExampleType::Preparation,
            Payload::Measurement { .. } => ExampleType::Measurement,
            Payload::Timing { .. } => ExampleType::Timing,
            Payload::Technique { .. } => ExampleType::Technique,
            Payload::Temperature { .. } => ExampleType::Temperature,
        }
    }
}

/// A labeled example derived from one cut point of a recording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct LabeledExample {
    pub recording_id: String,

    /// `{recording_id}_{step_id}`
    pub example_id: String,

    /// Effective end time of the trimmed window, `hh:mm:ss`
    pub end_time: String,

    pub activity_name: String,

    pub previous_steps: Vec<TraceStep>,

    pub current_step: TraceStep,

    #[serde(flatten)]
    pub payload: Payload,

    /// `{example_id}_{type}`
    pub question_id: String,

    /// Whether the history contains errors that may confuse the question
    pub is_noisy: bool,
}

impl LabeledExample {
    pub fn kind(&self) -> ExampleType {
        self.payload.kind()
    }
}
