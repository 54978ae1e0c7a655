//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod consensus;
mod generation;
mod logging;
mod output;
mod selection;

pub use consensus::FileConsensusConfig;
pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use selection::FileSelectionConfig;

use consensus_application::ConsensusParams;
use consensus_domain::ServiceTier;
use consensus_domain::workflow::plan::MAX_TEMPERATURE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("generation.temperatures cannot be empty")]
    EmptyTemperatures,

    #[error("generation.temperatures: {0} is outside 0.0-2.0")]
    TemperatureOutOfRange(f64),

    #[error("consensus.min_percent: {0} is outside 0-100")]
    PercentOutOfRange(f64),

    #[error("selection.size cannot be 0")]
    ZeroSelectionSize,

    #[error("selection.tier: unknown value '{0}' (valid: budget, standard, premium)")]
    UnknownTier(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Voting rule
    pub consensus: FileConsensusConfig,
    /// Sampling temperatures, retries and system prompt
    pub generation: FileGenerationConfig,
    /// Selection size and service tier
    pub selection: FileSelectionConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Result log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.generation.temperatures.is_empty() {
            return Err(ConfigValidationError::EmptyTemperatures);
        }
        if let Some(bad) = self
            .generation
            .temperatures
            .iter()
            .find(|t| !(0.0..=MAX_TEMPERATURE).contains(*t))
        {
            return Err(ConfigValidationError::TemperatureOutOfRange(*bad));
        }
        if let Some(percent) = self.consensus.min_percent
            && !(0.0..=100.0).contains(&percent)
        {
            return Err(ConfigValidationError::PercentOutOfRange(percent));
        }
        if self.selection.size == 0 {
            return Err(ConfigValidationError::ZeroSelectionSize);
        }
        self.parse_tier()?;
        Ok(())
    }

    /// Parse the tier string into a [`ServiceTier`]
    pub fn parse_tier(&self) -> Result<ServiceTier, ConfigValidationError> {
        self.selection
            .tier
            .parse()
            .map_err(|_| ConfigValidationError::UnknownTier(self.selection.tier.clone()))
    }

    /// Validate and convert into use case parameters
    pub fn to_params(&self) -> Result<ConsensusParams, ConfigValidationError> {
        self.validate()?;
        Ok(ConsensusParams::default()
            .with_temperatures(self.generation.temperatures.clone())
            .with_rule(self.consensus.to_rule())
            .with_selection_size(self.selection.size)
            .with_tier(self.parse_tier()?)
            .with_max_retries(self.generation.max_retries))
    }
}
