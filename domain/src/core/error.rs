//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Model output could not be parsed: {0}")]
    Parse(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Empty roster: at least one agent must join before stepping")]
    EmptyRoster,

    #[error("Duplicate agent name: {0}")]
    DuplicateAgentName(String),
}

impl DomainError {
    /// Check if this error came from interpreting model output
    pub fn is_parse(&self) -> bool {
        matches!(self, DomainError::Parse(_))
    }
}
