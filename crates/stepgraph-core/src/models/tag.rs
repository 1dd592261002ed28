//! Error tag enumeration for step annotations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of annotation error tags.
///
/// Tags outside the known set are preserved verbatim in [`ErrorTag::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorTag {
    MissingStep,
    OrderError,
    PreparationError,
    MeasurementError,
    TimingError,
    TechniqueError,
    TemperatureError,
    Other(String),
}

impl ErrorTag {
    /// Annotation string representation
    pub fn as_str(&self) -> &str {
        match self {
            ErrorTag::MissingStep => "Missing Step",
            ErrorTag::OrderError => "Order Error",
            ErrorTag::PreparationError => "Preparation Error",
            ErrorTag::MeasurementError => "Measurement Error",
            ErrorTag::TimingError => "Timing Error",
            ErrorTag::TechniqueError => "Technique Error",
            ErrorTag::TemperatureError => "Temperature Error",
            ErrorTag::Other(tag) => tag,
        }
    }

    /// Lowercase error kind without the "Error" suffix, e.g. `timing`.
    pub fn kind(&self) -> String {
        self.as_str().replace("Error", "").trim().to_lowercase()
    }
}

impl FromStr for ErrorTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Missing Step" => ErrorTag::MissingStep,
            "Order Error" => ErrorTag::OrderError,
            "Preparation Error" => ErrorTag::PreparationError,
            "Measurement Error" => ErrorTag::MeasurementError,
            "Timing Error" => ErrorTag::TimingError,
            "Technique Error" => ErrorTag::TechniqueError,
            "Temperature Error" => ErrorTag::TemperatureError,
            other => ErrorTag::Other(other.to_string()),
        })
    }
}

impl From<String> for ErrorTag {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<ErrorTag> for String {
    fn from(tag: ErrorTag) -> Self {
        tag.as_str().to_string()
    }
}
