//! Service tier of the requesting customer

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Service tier
///
/// Shapes selection: budget customers favour no-code tools and get a harsher
/// weight on medium-feasibility work, premium customers the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTier {
    Budget,
    #[default]
    Standard,
    Premium,
}

impl ServiceTier {
    /// Final multiplier on every candidate's score
    pub fn multiplier(&self) -> f64 {
        match self {
            ServiceTier::Budget => 1.0,
            ServiceTier::Standard => 1.1,
            ServiceTier::Premium => 1.2,
        }
    }

    /// Feasibility weight given to "Medium" candidates
    pub fn medium_feasibility_weight(&self) -> f64 {
        match self {
            ServiceTier::Budget => 0.6,
            ServiceTier::Standard => 0.75,
            ServiceTier::Premium => 0.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTier::Budget => "budget",
            ServiceTier::Standard => "standard",
            ServiceTier::Premium => "premium",
        }
    }
}

impl std::fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ServiceTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(ServiceTier::Budget),
            "standard" => Ok(ServiceTier::Standard),
            "premium" => Ok(ServiceTier::Premium),
            _ => Err(DomainError::UnknownTier(s.to_string())),
        }
    }
}
