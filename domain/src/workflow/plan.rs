//! Sampling plan for parallel generations

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Highest sampling temperature accepted by any provider we target.
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Temperatures for the parallel completions, in voting order
///
/// ```
/// use consensus_domain::GenerationPlan;
///
/// let plan = GenerationPlan::default();
/// assert_eq!(plan.len(), 5);
/// assert!(GenerationPlan::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPlan {
    temperatures: Vec<f64>,
}

impl Default for GenerationPlan {
    fn default() -> Self {
        Self {
            temperatures: vec![0.3, 0.5, 0.7, 0.9, 1.0],
        }
    }
}

impl GenerationPlan {
    /// Validate and build a plan
    pub fn new(temperatures: Vec<f64>) -> Result<Self, DomainError> {
        if temperatures.is_empty() {
            return Err(DomainError::NoTemperatures);
        }
        if let Some(bad) = temperatures
            .iter()
            .find(|t| !t.is_finite() || **t < 0.0 || **t > MAX_TEMPERATURE)
        {
            return Err(DomainError::InvalidTemperature(*bad));
        }
        Ok(Self { temperatures })
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }
}
