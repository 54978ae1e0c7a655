//! Consensus parameters: use case control.
//!
//! [`ConsensusParams`] groups everything [`RunConsensusUseCase`] needs to
//! know besides the prompt itself: how to sample, how to vote and how many
//! candidates to select.
//!
//! [`RunConsensusUseCase`]: crate::use_cases::run_consensus::RunConsensusUseCase

use consensus_domain::{ConsensusRule, DomainError, GenerationPlan, ServiceTier};
use serde::{Deserialize, Serialize};

/// Default number of candidates in the final selection.
pub const DEFAULT_SELECTION_SIZE: usize = 5;

/// Use case control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// One completion is requested per temperature, in this order.
    pub temperatures: Vec<f64>,
    /// Gate for trusting the plurality winner.
    pub rule: ConsensusRule,
    /// Number of candidates to select (K).
    pub selection_size: usize,
    /// Tier of the customer the selection is made for.
    pub tier: ServiceTier,
    /// Sequential re-generations allowed for an invalid completion.
    pub max_retries: usize,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            temperatures: GenerationPlan::default().temperatures().to_vec(),
            rule: ConsensusRule::default(),
            selection_size: DEFAULT_SELECTION_SIZE,
            tier: ServiceTier::default(),
            max_retries: 2,
        }
    }
}

impl ConsensusParams {
    // ==================== Builder Methods ====================

    pub fn with_temperatures(mut self, temperatures: Vec<f64>) -> Self {
        self.temperatures = temperatures;
        self
    }

    pub fn with_rule(mut self, rule: ConsensusRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_selection_size(mut self, size: usize) -> Self {
        self.selection_size = size;
        self
    }

    pub fn with_tier(mut self, tier: ServiceTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    // ==================== Validation ====================

    /// Validate the parameters and build the sampling plan.
    pub fn validate(&self) -> Result<GenerationPlan, DomainError> {
        if let Some(percent) = self.rule.min_percent
            && !(0.0..=100.0).contains(&percent)
        {
            return Err(DomainError::InvalidPercentage(percent));
        }
        if self.selection_size == 0 {
            return Err(DomainError::EmptySelection);
        }
        GenerationPlan::new(self.temperatures.clone())
    }
}
