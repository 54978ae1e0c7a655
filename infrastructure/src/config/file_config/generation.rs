//! Generation configuration from TOML (`[generation]` section)

use consensus_domain::GenerationPlan;
use serde::{Deserialize, Serialize};

/// Raw generation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// One completion per temperature, in voting order
    pub temperatures: Vec<f64>,
    /// Re-generations allowed for an invalid completion
    pub max_retries: usize,
    /// System prompt sent with every generation
    pub system_prompt: Option<String>,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            temperatures: GenerationPlan::default().temperatures().to_vec(),
            max_retries: 2,
            system_prompt: None,
        }
    }
}
