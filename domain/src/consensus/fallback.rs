//! Heuristic ranking used when voting produces no consensus.
//!
//! Every candidate from every parsed response is scored out of 100:
//!
//! | Component | Max | Signal |
//! |-----------|-----|--------|
//! | Feasibility | 40 | feasibility cell |
//! | Impact | 30 | objective + problems keywords |
//! | Complexity | 30 | how-it-works + tools keywords (simpler scores higher) |

use super::result::NO_CONSENSUS;
use crate::candidate::{Candidate, Feasibility, ParsedResponse};
use serde::{Deserialize, Serialize};

const HIGH_IMPACT_KEYWORDS: &[&str] = &[
    "critical",
    "major",
    "significant",
    "revenue",
    "cost savings",
    "efficiency",
];
const MEDIUM_IMPACT_KEYWORDS: &[&str] = &["important", "helpful", "useful", "improve"];
const SIMPLE_KEYWORDS: &[&str] = &["simple", "straightforward", "existing", "standard", "template"];
const COMPLEX_KEYWORDS: &[&str] = &[
    "custom",
    "complex",
    "advanced",
    "integration",
    "multiple systems",
];

/// Per-component fallback score of one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackScore {
    pub feasibility: u32,
    pub impact: u32,
    pub complexity: u32,
}

impl FallbackScore {
    pub fn of(candidate: &Candidate) -> Self {
        Self {
            feasibility: feasibility_points(candidate),
            impact: impact_points(candidate),
            complexity: complexity_points(candidate),
        }
    }

    pub fn total(&self) -> u32 {
        self.feasibility + self.impact + self.complexity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub score: FallbackScore,
}

/// Result of [`rank_by_score`]
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRanking {
    /// Name of the top-ranked candidate, or `"No consensus"` when empty
    pub best_name: String,
    /// All candidates, best first; ties keep their original order
    pub ranked: Vec<RankedCandidate>,
}

impl FallbackRanking {
    pub fn best_score(&self) -> Option<u32> {
        self.ranked.first().map(|r| r.score.total())
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.ranked.into_iter().map(|r| r.candidate).collect()
    }
}

/// Pool every candidate of every response and rank them by fallback score.
///
/// The sort is stable: equal totals keep response order, then row order.
pub fn rank_by_score(all_parsed: &[ParsedResponse]) -> FallbackRanking {
    let mut ranked: Vec<RankedCandidate> = all_parsed
        .iter()
        .flat_map(|parsed| parsed.candidates.iter())
        .map(|candidate| RankedCandidate {
            score: FallbackScore::of(candidate),
            candidate: candidate.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total().cmp(&a.score.total()));

    let best_name = ranked
        .first()
        .map_or_else(|| NO_CONSENSUS.to_string(), |r| r.candidate.name.clone());

    FallbackRanking { best_name, ranked }
}

fn feasibility_points(candidate: &Candidate) -> u32 {
    match candidate.feasibility_level() {
        Some(Feasibility::High) => 40,
        Some(Feasibility::Medium) => 25,
        Some(Feasibility::Low) => 10,
        None => 20,
    }
}

fn impact_points(candidate: &Candidate) -> u32 {
    let text = format!("{} {}", candidate.objective, candidate.problems).to_lowercase();
    if contains_any(&text, HIGH_IMPACT_KEYWORDS) {
        30
    } else if contains_any(&text, MEDIUM_IMPACT_KEYWORDS) {
        20
    } else {
        15
    }
}

fn complexity_points(candidate: &Candidate) -> u32 {
    let text = format!("{} {}", candidate.description, candidate.tools.join(" ")).to_lowercase();
    if contains_any(&text, SIMPLE_KEYWORDS) {
        30
    } else if contains_any(&text, COMPLEX_KEYWORDS) {
        10
    } else {
        20
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
