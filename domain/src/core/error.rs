//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No sampling temperatures configured")]
    NoTemperatures,

    #[error("Invalid temperature {0}: must be between 0.0 and 2.0")]
    InvalidTemperature(f64),

    #[error("Invalid percentage {0}: must be between 0 and 100")]
    InvalidPercentage(f64),

    #[error("Unknown service tier: {0}. Valid: budget, standard, premium")]
    UnknownTier(String),

    #[error("Selection size must be at least 1")]
    EmptySelection,
}

impl DomainError {
    /// Check if this error comes from the sampling plan
    pub fn is_generation_error(&self) -> bool {
        matches!(
            self,
            DomainError::NoTemperatures | DomainError::InvalidTemperature(_)
        )
    }
}
