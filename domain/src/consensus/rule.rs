//! Consensus gating rule
//!
//! Decides whether a plurality winner is strong enough to be trusted, or
//! whether the engine must fall back to heuristic ranking.

use serde::{Deserialize, Serialize};

/// Rule for declaring consensus on a plurality winner
///
/// Two knobs, both enforced when set:
/// - `min_votes`: the winner needs at least this many votes
/// - `min_percent`: optionally, the winner's share of parsed responses must
///   reach this percentage (compared on the unrounded ratio)
///
/// # Example
///
/// ```
/// use consensus_domain::ConsensusRule;
///
/// let votes_only = ConsensusRule::new(3);
/// assert!(votes_only.is_satisfied(3, 10));   // 30% is fine without a percent floor
///
/// let strict = ConsensusRule::new(3).with_min_percent(50.0);
/// assert!(!strict.is_satisfied(3, 10));      // 30% < 50%
/// assert!(strict.is_satisfied(3, 5));        // 60% >= 50%
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRule {
    /// Minimum votes for the plurality winner
    pub min_votes: usize,
    /// Minimum share of parsed responses (0-100), if enforced
    pub min_percent: Option<f64>,
}

impl Default for ConsensusRule {
    fn default() -> Self {
        Self {
            min_votes: 3,
            min_percent: None,
        }
    }
}

impl ConsensusRule {
    /// Votes-only rule
    pub fn new(min_votes: usize) -> Self {
        Self {
            min_votes,
            min_percent: None,
        }
    }

    /// Also require a minimum percentage (clamped to 0-100)
    pub fn with_min_percent(mut self, percent: f64) -> Self {
        self.min_percent = Some(percent.clamp(0.0, 100.0));
        self
    }

    /// Check whether `votes` out of `total` parsed responses satisfies the rule
    pub fn is_satisfied(&self, votes: usize, total: usize) -> bool {
        if total == 0 || votes == 0 {
            return false;
        }

        let enough_votes = votes >= self.min_votes;
        let enough_share = match self.min_percent {
            Some(percent) => votes as f64 * 100.0 >= percent * total as f64,
            None => true,
        };

        enough_votes && enough_share
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self.min_percent {
            Some(p) => format!("at least {} votes and {}% of responses", self.min_votes, p),
            None => format!("at least {} votes", self.min_votes),
        }
    }
}

impl std::fmt::Display for ConsensusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for ConsensusRule {
    type Err = String;

    /// Parse `"votes:N"`, optionally followed by `",P%"` or `",percent:P"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rule: Option<ConsensusRule> = None;
        let mut percent: Option<f64> = None;

        for part in s.to_lowercase().split(',').map(str::trim) {
            if let Some(n) = part
                .strip_prefix("votes:")
                .or_else(|| part.strip_prefix("atleast:"))
            {
                let n: usize = n.trim().parse().map_err(|_| "Invalid number for votes")?;
                rule = Some(ConsensusRule::new(n));
            } else if let Some(p) = part
                .strip_prefix("percent:")
                .or_else(|| part.strip_suffix('%'))
            {
                let p: f64 = p.trim().parse().map_err(|_| "Invalid percentage")?;
                percent = Some(p);
            } else {
                return Err(format!(
                    "Unknown consensus rule part: {}. Valid: votes:N, percent:P or P%",
                    part
                ));
            }
        }

        let rule = rule.ok_or("Consensus rule needs votes:N")?;
        Ok(match percent {
            Some(p) => rule.with_min_percent(p),
            None => rule,
        })
    }
}
