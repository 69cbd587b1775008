use thiserror::Error;

use crate::types::Year;

#[derive(Debug, Error)]
pub enum OceanSolutionError {
    #[error("Configuration error: {field} — {reason}")]
    Config { field: String, reason: String },

    #[error("Unable to initialise scenario '{scenario}': {reason}")]
    ScenarioInitialization { scenario: String, reason: String },

    #[error("Year {year} is outside the series range ({range})")]
    SeriesRange { year: Year, range: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OceanSolutionError {
    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OceanSolutionError::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for OceanSolutionError {
    fn from(e: serde_json::Error) -> Self {
        OceanSolutionError::Serialization(e.to_string())
    }
}
