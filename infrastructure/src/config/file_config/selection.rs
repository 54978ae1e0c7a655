//! Selection configuration from TOML (`[selection]` section)

use consensus_application::config::DEFAULT_SELECTION_SIZE;
use consensus_domain::ServiceTier;
use serde::{Deserialize, Serialize};

/// Raw selection configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    /// Number of candidates to select (K)
    pub size: usize,
    /// Service tier: "budget", "standard" or "premium"
    pub tier: String,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SELECTION_SIZE,
            tier: ServiceTier::default().as_str().to_string(),
        }
    }
}
