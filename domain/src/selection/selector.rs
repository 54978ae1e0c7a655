//! Diversity-aware top-K selection.
//!
//! # Scoring
//!
//! ```text
//! score = relevance × feasibility × impact × tools × consensus bonus × tier multiplier
//! ```
//!
//! # Selection
//!
//! A single greedy pass over candidates sorted by score:
//!
//! 1. With 50 or more candidates, anything below 0.75 relevance is dropped.
//! 2. Names already selected (after normalization) are skipped.
//! 3. The first candidate is always the top scorer.
//! 4. A candidate from an uncovered domain is accepted with a diversity bonus.
//! 5. A candidate from a covered domain is accepted only if it beats the last
//!    accepted score by 30%, or once three domains are covered.
//!
//! Candidates deferred by rule 5 backfill any remaining slots in score order.

use super::category::WorkflowDomain;
use super::scoring::{feasibility_weight, metrics_impact, tool_practicality};
use super::semantic::PromptProfile;
use super::tier::ServiceTier;
use crate::candidate::Candidate;
use crate::consensus::ConsensusStrength;
use std::collections::HashSet;
use tracing::{debug, info};

/// Pools at least this large get the relevance floor.
pub const SEMANTIC_FLOOR_POOL_SIZE: usize = 50;
pub const SEMANTIC_FLOOR: f64 = 0.75;
const REPEAT_DOMAIN_MARGIN: f64 = 1.3;
const DIVERSE_DOMAIN_COUNT: usize = 3;

/// A pool entry with every factor that went into its score
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a Candidate,
    /// Normalized name
    pub key: String,
    pub semantic: f64,
    pub feasibility: f64,
    pub impact: f64,
    pub tools: f64,
    pub score: f64,
    pub domain: WorkflowDomain,
}

/// Score every candidate and sort best first (stable on ties).
pub fn score_pool<'a>(
    pool: &'a [Candidate],
    profile: &PromptProfile,
    tier: ServiceTier,
    strength: ConsensusStrength,
) -> Vec<ScoredCandidate<'a>> {
    let mut scored: Vec<ScoredCandidate<'a>> = pool
        .iter()
        .map(|candidate| {
            let semantic = profile.relevance(candidate);
            let feasibility = feasibility_weight(candidate, tier);
            let impact = metrics_impact(&candidate.metrics);
            let tools = tool_practicality(&candidate.tools, tier);
            let score = semantic
                * feasibility
                * impact
                * tools
                * strength.selection_bonus()
                * tier.multiplier();

            ScoredCandidate {
                candidate,
                key: candidate.normalized_name(),
                semantic,
                feasibility,
                impact,
                tools,
                score,
                domain: WorkflowDomain::classify(candidate),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Pick up to `k` candidates for the final report.
///
/// The result never holds two candidates with the same normalized name. For
/// pools no larger than `k` the pool is returned in order, minus duplicates.
///
/// # Example
///
/// ```
/// use consensus_domain::{Candidate, ConsensusStrength, ServiceTier};
/// use consensus_domain::selection::select_top_k;
///
/// let pool: Vec<Candidate> = (1..=8)
///     .map(|i| Candidate::new(format!("Invoice Workflow {i}")).with_feasibility("High"))
///     .collect();
///
/// let picked = select_top_k(&pool, 5, ServiceTier::Standard, "invoice automation", ConsensusStrength::Strong);
/// assert_eq!(picked.len(), 5);
/// ```
pub fn select_top_k(
    pool: &[Candidate],
    k: usize,
    tier: ServiceTier,
    user_prompt: &str,
    strength: ConsensusStrength,
) -> Vec<Candidate> {
    if k == 0 || pool.is_empty() {
        return Vec::new();
    }
    if pool.len() <= k {
        return dedupe_by_name(pool);
    }

    let profile = PromptProfile::new(user_prompt);
    let scored = score_pool(pool, &profile, tier, strength);
    let apply_floor = pool.len() >= SEMANTIC_FLOOR_POOL_SIZE;

    let eligible: Vec<&ScoredCandidate> = scored
        .iter()
        .filter(|entry| {
            let passes = !apply_floor || entry.semantic >= SEMANTIC_FLOOR;
            if !passes {
                debug!(
                    "Semantic floor rejected '{}' (relevance {:.2})",
                    entry.candidate.name, entry.semantic
                );
            }
            passes
        })
        .collect();

    let mut selected: Vec<&ScoredCandidate> = Vec::with_capacity(k);
    let mut names: HashSet<&str> = HashSet::new();
    let mut domains: HashSet<WorkflowDomain> = HashSet::new();
    let mut last_score = 0.0;

    for &entry in &eligible {
        if selected.len() >= k {
            break;
        }
        if names.contains(entry.key.as_str()) {
            continue;
        }

        let accepted_score = if selected.is_empty() {
            Some(entry.score)
        } else if !domains.contains(&entry.domain) {
            Some(entry.score * diversity_multiplier(entry.semantic))
        } else if entry.score > last_score * REPEAT_DOMAIN_MARGIN
            || domains.len() >= DIVERSE_DOMAIN_COUNT
        {
            Some(entry.score)
        } else {
            None
        };

        if let Some(score) = accepted_score {
            debug!(
                "Selected '{}' ({}, score {:.2}, relevance {:.2})",
                entry.candidate.name, entry.domain, score, entry.semantic
            );
            names.insert(entry.key.as_str());
            domains.insert(entry.domain);
            last_score = score;
            selected.push(entry);
        }
    }

    if selected.len() < k {
        for &entry in &eligible {
            if selected.len() >= k {
                break;
            }
            if names.insert(entry.key.as_str()) {
                debug!("Backfilled '{}' ({})", entry.candidate.name, entry.domain);
                selected.push(entry);
            }
        }
    }

    info!(
        "Selected {} of {} candidates across {} domains",
        selected.len(),
        pool.len(),
        selected.iter().map(|e| e.domain).collect::<HashSet<_>>().len()
    );

    selected
        .into_iter()
        .map(|entry| entry.candidate.clone())
        .collect()
}

fn diversity_multiplier(semantic: f64) -> f64 {
    if semantic >= 1.5 {
        1.5
    } else if semantic >= 1.0 {
        1.3
    } else {
        1.1
    }
}

fn dedupe_by_name(pool: &[Candidate]) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    pool.iter()
        .filter(|candidate| seen.insert(candidate.normalized_name()))
        .cloned()
        .collect()
}
