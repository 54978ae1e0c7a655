//! Vote buckets for plurality voting
//!
//! Each parsed response casts one vote for its declared answer. Votes are
//! consolidated first by normalized key, then by fuzzy match against the
//! display labels of existing buckets.

use crate::text::{DEFAULT_FUZZY_THRESHOLD, find_best_match, normalize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Votes collected for one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBucket {
    /// Normalized answer
    pub key: String,
    /// First-seen original label
    pub display_name: String,
    pub count: usize,
}

/// How a vote landed in its bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastOutcome {
    /// Opened a new bucket
    New,
    /// Normalized key matched an existing bucket
    Exact,
    /// Consolidated into a near-duplicate bucket
    Fuzzy { matched: String },
    /// Answer normalized to an empty string; not counted
    Ignored,
}

/// Running tally of votes
///
/// Buckets keep insertion order. The running winner is the first bucket to
/// reach the highest count; later buckets that merely tie do not take over.
///
/// # Example
///
/// ```
/// use consensus_domain::consensus::VoteTally;
///
/// let mut tally = VoteTally::new();
/// tally.cast("**Invoice Matcher**");
/// tally.cast("the invoice matcher.");
/// tally.cast("Lead Scorer");
///
/// let winner = tally.winner().unwrap();
/// assert_eq!(winner.key, "invoice matcher");
/// assert_eq!(winner.count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct VoteTally {
    buckets: Vec<VoteBucket>,
    index: HashMap<String, usize>,
    winner: Option<usize>,
    fuzzy_matches: usize,
    threshold: f64,
}

impl Default for VoteTally {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteTally {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_FUZZY_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            buckets: Vec::new(),
            index: HashMap::new(),
            winner: None,
            fuzzy_matches: 0,
            threshold,
        }
    }

    /// Cast one vote for `answer`
    pub fn cast(&mut self, answer: &str) -> CastOutcome {
        let key = normalize(answer);
        if key.is_empty() {
            return CastOutcome::Ignored;
        }

        let (position, outcome) = if let Some(&position) = self.index.get(&key) {
            (position, CastOutcome::Exact)
        } else if let Some(matched) = find_best_match(
            answer,
            self.buckets.iter().map(|b| b.display_name.as_str()),
            self.threshold,
        ) {
            let matched = matched.to_string();
            let position = self
                .buckets
                .iter()
                .position(|b| b.display_name == matched)
                .unwrap_or_default();
            self.fuzzy_matches += 1;
            (position, CastOutcome::Fuzzy { matched })
        } else {
            self.buckets.push(VoteBucket {
                key: key.clone(),
                display_name: answer.trim().to_string(),
                count: 0,
            });
            let position = self.buckets.len() - 1;
            self.index.insert(key, position);
            (position, CastOutcome::New)
        };

        self.buckets[position].count += 1;
        let leads = match self.winner {
            Some(current) => self.buckets[position].count > self.buckets[current].count,
            None => true,
        };
        if leads {
            self.winner = Some(position);
        }

        outcome
    }

    pub fn winner(&self) -> Option<&VoteBucket> {
        self.winner.map(|i| &self.buckets[i])
    }

    pub fn buckets(&self) -> &[VoteBucket] {
        &self.buckets
    }

    /// Votes consolidated via fuzzy matching rather than exact key match
    pub fn fuzzy_matches(&self) -> usize {
        self.fuzzy_matches
    }

    pub fn total_votes(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Visual vote summary, e.g. `"[●●●○○]"` with the winner's votes filled
    pub fn vote_summary(&self) -> String {
        let winning = self.winner().map_or(0, |w| w.count);
        let mut summary = String::from("[");
        for i in 0..self.total_votes() {
            summary.push(if i < winning { '●' } else { '○' });
        }
        summary.push(']');
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_votes_share_bucket() {
        let mut tally = VoteTally::new();
        assert_eq!(tally.cast("Support Bot"), CastOutcome::New);
        assert_eq!(tally.cast("**support bot**."), CastOutcome::Exact);

        assert_eq!(tally.buckets().len(), 1);
        assert_eq!(tally.winner().unwrap().count, 2);
        assert_eq!(tally.fuzzy_matches(), 0);
    }

    #[test]
    fn test_fuzzy_votes_consolidate() {
        let mut tally = VoteTally::new();
        tally.cast("Invoice Processing Bot");
        let outcome = tally.cast("Invoice Processor Bot");

        assert_eq!(
            outcome,
            CastOutcome::Fuzzy {
                matched: "Invoice Processing Bot".to_string()
            }
        );
        assert_eq!(tally.buckets().len(), 1);
        assert_eq!(tally.fuzzy_matches(), 1);
        assert_eq!(tally.winner().unwrap().display_name, "Invoice Processing Bot");
    }

    #[test]
    fn test_tie_keeps_first_bucket_to_reach_count() {
        let mut tally = VoteTally::new();
        tally.cast("Lead Scorer");
        tally.cast("Expense Auditor");
        tally.cast("Expense Auditor");
        tally.cast("Lead Scorer");

        // Both have 2 votes; Expense Auditor got there first
        assert_eq!(tally.winner().unwrap().key, "expense auditor");
    }

    #[test]
    fn test_first_bucket_wins_on_single_votes() {
        let mut tally = VoteTally::new();
        tally.cast("Lead Scorer");
        tally.cast("Expense Auditor");
        assert_eq!(tally.winner().unwrap().key, "lead scorer");
    }

    #[test]
    fn test_empty_answer_ignored() {
        let mut tally = VoteTally::new();
        assert_eq!(tally.cast("  "), CastOutcome::Ignored);
        assert!(tally.winner().is_none());
        assert_eq!(tally.total_votes(), 0);
    }

    #[test]
    fn test_vote_summary() {
        let mut tally = VoteTally::new();
        tally.cast("Lead Scorer");
        tally.cast("Lead Scorer");
        tally.cast("Expense Auditor");
        assert_eq!(tally.vote_summary(), "[●●○]");
    }
}
