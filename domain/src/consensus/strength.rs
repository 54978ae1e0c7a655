//! Consensus strength classification

use serde::{Deserialize, Serialize};

/// Highest score the fallback ranker is allowed to report as confidence.
pub const FALLBACK_SCORE_CAP: f64 = 85.0;

/// How much the engine trusts its final answer
///
/// The first three come from voting; the `Fallback*` tiers are used when no
/// answer reached consensus and the winner was picked by heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsensusStrength {
    Strong,
    Moderate,
    Weak,
    #[serde(rename = "Fallback-High")]
    FallbackHigh,
    #[serde(rename = "Fallback-Medium")]
    FallbackMedium,
    #[serde(rename = "Fallback-Low")]
    FallbackLow,
}

impl ConsensusStrength {
    /// Classify a vote share: `>= 67` Strong, `>= 40` Moderate, else Weak.
    pub fn from_vote_percent(percent: u8) -> Self {
        if percent >= 67 {
            ConsensusStrength::Strong
        } else if percent >= 40 {
            ConsensusStrength::Moderate
        } else {
            ConsensusStrength::Weak
        }
    }

    /// Classify a fallback score after capping at [`FALLBACK_SCORE_CAP`].
    pub fn from_fallback_score(score: f64) -> Self {
        let capped = score.min(FALLBACK_SCORE_CAP);
        if capped >= 75.0 {
            ConsensusStrength::FallbackHigh
        } else if capped >= 60.0 {
            ConsensusStrength::FallbackMedium
        } else {
            ConsensusStrength::FallbackLow
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ConsensusStrength::FallbackHigh
                | ConsensusStrength::FallbackMedium
                | ConsensusStrength::FallbackLow
        )
    }

    /// Score multiplier the selector grants candidates backed by this strength
    pub fn selection_bonus(&self) -> f64 {
        match self {
            ConsensusStrength::Strong => 1.2,
            ConsensusStrength::Moderate => 1.1,
            _ => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusStrength::Strong => "Strong",
            ConsensusStrength::Moderate => "Moderate",
            ConsensusStrength::Weak => "Weak",
            ConsensusStrength::FallbackHigh => "Fallback-High",
            ConsensusStrength::FallbackMedium => "Fallback-Medium",
            ConsensusStrength::FallbackLow => "Fallback-Low",
        }
    }
}

impl std::fmt::Display for ConsensusStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
