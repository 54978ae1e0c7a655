//! Consensus result type

use super::strength::ConsensusStrength;
use crate::candidate::Candidate;
use serde::{Deserialize, Serialize};

/// Final answer reported when no candidate could be determined.
pub const NO_CONSENSUS: &str = "No consensus";

/// Output of vote aggregation (and fallback ranking, when voting failed)
///
/// `confidence_percent` is what downstream consumers see. On the fallback
/// path it is replaced by the capped fallback score; the original vote-based
/// figure stays available in `vote_confidence_percent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Label of the selected candidate, in the casing of its table
    pub final_answer: String,
    /// Parsed responses with a declared answer
    pub total_responses: usize,
    pub votes_for_winner: usize,
    pub confidence_percent: u8,
    /// `round(votes_for_winner / total_responses * 100)`, kept for diagnostics
    pub vote_confidence_percent: u8,
    pub consensus_strength: ConsensusStrength,
    pub had_consensus: bool,
    /// Winning table (consensus) or every candidate ranked by score (fallback)
    pub all_candidates: Vec<Candidate>,
    /// Votes consolidated through fuzzy matching
    pub fuzzy_matches: usize,
    /// Uncapped fallback score of the winner, when the fallback path ran
    pub fallback_score: Option<u32>,
}

impl ConsensusResult {
    /// Result for a run in which nothing could be parsed
    pub fn no_consensus() -> Self {
        Self {
            final_answer: NO_CONSENSUS.to_string(),
            total_responses: 0,
            votes_for_winner: 0,
            confidence_percent: 0,
            vote_confidence_percent: 0,
            consensus_strength: ConsensusStrength::Weak,
            had_consensus: false,
            all_candidates: Vec::new(),
            fuzzy_matches: 0,
            fallback_score: None,
        }
    }

    /// No recommendation can be rendered from this result
    ///
    /// True whenever there are no candidates, including a vote that was won
    /// by a response whose table had no complete rows.
    pub fn is_terminal_failure(&self) -> bool {
        self.all_candidates.is_empty()
    }

    pub fn used_fallback(&self) -> bool {
        self.consensus_strength.is_fallback()
    }
}

/// `round(votes / total * 100)`, or 0 when there are no responses
pub fn vote_percent(votes: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (votes as f64 / total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
