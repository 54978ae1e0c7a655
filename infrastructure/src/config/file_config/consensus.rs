//! Voting configuration from TOML (`[consensus]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [consensus]
//! min_votes = 3        # the plurality winner needs at least 3 votes
//! min_percent = 50.0   # and at least half of the parsed responses
//! ```

use consensus_domain::ConsensusRule;
use serde::{Deserialize, Serialize};

/// Raw consensus configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Minimum votes for the plurality winner
    pub min_votes: usize,
    /// Optional minimum share of parsed responses, 0-100
    pub min_percent: Option<f64>,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        let rule = ConsensusRule::default();
        Self {
            min_votes: rule.min_votes,
            min_percent: rule.min_percent,
        }
    }
}

impl FileConsensusConfig {
    /// Build the rule (range checks happen in `FileConfig::validate`)
    pub fn to_rule(&self) -> ConsensusRule {
        ConsensusRule {
            min_votes: self.min_votes,
            min_percent: self.min_percent,
        }
    }
}
