//! Vote aggregation across parallel completions.
//!
//! Responses are processed in the order given, which the caller keeps equal
//! to temperature order. Two tie-breaks depend on that order:
//!
//! - between buckets with the same count, the first to reach it wins
//! - the winning table is taken from the first response that voted for the
//!   winning key

use super::fallback::rank_by_score;
use super::result::{ConsensusResult, NO_CONSENSUS, vote_percent};
use super::rule::ConsensusRule;
use super::strength::{ConsensusStrength, FALLBACK_SCORE_CAP};
use super::vote::{CastOutcome, VoteTally};
use crate::candidate::{Candidate, ParsedResponse, parse_response};
use crate::text::{DEFAULT_FUZZY_THRESHOLD, find_best_match, normalize};
use tracing::{debug, info, warn};

/// Parse raw completions and aggregate their votes.
///
/// Completions that fail to parse are logged and excluded; they do not count
/// toward `total_responses`.
pub fn count_votes<S: AsRef<str>>(responses: &[S], rule: &ConsensusRule) -> ConsensusResult {
    let parsed: Vec<ParsedResponse> = responses
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| match parse_response(raw.as_ref()) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                warn!("Excluding response {} from voting: {}", i + 1, reason);
                None
            }
        })
        .collect();

    count_parsed_votes(&parsed, rule)
}

/// Aggregate votes of already-parsed responses.
///
/// # Example
///
/// ```
/// use consensus_domain::{Candidate, ConsensusRule, ParsedResponse};
/// use consensus_domain::consensus::count_parsed_votes;
///
/// let table = vec![Candidate::new("Lead Scorer"), Candidate::new("Expense Auditor")];
/// let parsed = vec![
///     ParsedResponse::new("lead scorer", table.clone()),
///     ParsedResponse::new("LEAD SCORER", table.clone()),
///     ParsedResponse::new("Expense Auditor", table),
/// ];
///
/// let result = count_parsed_votes(&parsed, &ConsensusRule::new(2));
/// assert!(result.had_consensus);
/// assert_eq!(result.final_answer, "Lead Scorer");
/// assert_eq!(result.confidence_percent, 67);
/// ```
pub fn count_parsed_votes(parsed: &[ParsedResponse], rule: &ConsensusRule) -> ConsensusResult {
    if parsed.is_empty() {
        warn!("No parseable responses; nothing to vote on");
        return ConsensusResult::no_consensus();
    }

    let mut tally = VoteTally::new();
    for response in parsed {
        if let CastOutcome::Fuzzy { matched } = tally.cast(&response.answer) {
            debug!(
                "Fuzzy-matched vote '{}' into existing answer '{}'",
                response.answer, matched
            );
        }
    }

    let total_responses = parsed.len();
    let (winning_key, winning_label, votes_for_winner) = tally
        .winner()
        .map(|w| (w.key.clone(), w.display_name.clone(), w.count))
        .unwrap_or_default();

    let vote_confidence = vote_percent(votes_for_winner, total_responses);
    let had_consensus = !winning_key.is_empty() && rule.is_satisfied(votes_for_winner, total_responses);

    debug!(
        "Votes {} for '{}' ({}/{} = {}%, {} fuzzy matches)",
        tally.vote_summary(),
        winning_label,
        votes_for_winner,
        total_responses,
        vote_confidence,
        tally.fuzzy_matches()
    );

    let mut result = ConsensusResult {
        final_answer: winning_label,
        total_responses,
        votes_for_winner,
        confidence_percent: vote_confidence,
        vote_confidence_percent: vote_confidence,
        consensus_strength: ConsensusStrength::from_vote_percent(vote_confidence),
        had_consensus,
        all_candidates: Vec::new(),
        fuzzy_matches: tally.fuzzy_matches(),
        fallback_score: None,
    };

    if had_consensus {
        if let Some(table) = parsed
            .iter()
            .find(|response| response.normalized_answer() == winning_key)
            .map(|response| &response.candidates)
        {
            if let Some(canonical) = canonical_name(table, &result.final_answer) {
                result.final_answer = canonical;
            }
            result.all_candidates = table.clone();
        }
        if result.all_candidates.is_empty() {
            warn!(
                "Consensus on '{}' but its table has no complete rows; nothing to recommend",
                result.final_answer
            );
            return result;
        }
        info!(
            "Consensus on '{}' with {}/{} votes ({})",
            result.final_answer, votes_for_winner, total_responses, result.consensus_strength
        );
        return result;
    }

    info!(
        "No consensus ({}/{} votes, need {}); using fallback ranking",
        votes_for_winner, total_responses, rule
    );
    apply_fallback(result, parsed)
}

fn apply_fallback(mut result: ConsensusResult, parsed: &[ParsedResponse]) -> ConsensusResult {
    let ranking = rank_by_score(parsed);

    match ranking.best_score() {
        Some(score) => {
            let capped = f64::from(score).min(FALLBACK_SCORE_CAP);
            result.final_answer = ranking.best_name.clone();
            result.confidence_percent = capped.round() as u8;
            result.consensus_strength = ConsensusStrength::from_fallback_score(capped);
            result.fallback_score = Some(score);
            info!(
                "Fallback selected '{}' (score {}, {})",
                result.final_answer, score, result.consensus_strength
            );
        }
        None => {
            warn!("Fallback ranking found no candidates in any response");
            result.final_answer = NO_CONSENSUS.to_string();
            result.confidence_percent = 0;
            result.consensus_strength = ConsensusStrength::FallbackLow;
        }
    }

    result.all_candidates = ranking.into_candidates();
    result
}

/// Table spelling of the winning answer: the matching row, else the first row
fn canonical_name(table: &[Candidate], answer: &str) -> Option<String> {
    let key = normalize(answer);
    table
        .iter()
        .find(|candidate| candidate.normalized_name() == key)
        .map(|candidate| candidate.name.clone())
        .or_else(|| {
            find_best_match(
                answer,
                table.iter().map(|c| c.name.as_str()),
                DEFAULT_FUZZY_THRESHOLD,
            )
            .map(str::to_string)
        })
        .or_else(|| table.first().map(|candidate| candidate.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "| Rank | Name | Objective | Problems | How It Works | Tools | Metrics | Feasibility |";
    const SEPARATOR: &str = "|---|---|---|---|---|---|---|---|";

    fn table_response(rows: &[(&str, &str)], answer: &str) -> String {
        let mut text = format!("{HEADER}\n{SEPARATOR}\n");
        for (i, (name, feasibility)) in rows.iter().enumerate() {
            text.push_str(&format!(
                "| {} | {name} | Reduce manual entry | Slow processing | Connects tools | Zapier | 40% reduction | {feasibility} |\n",
                i + 1
            ));
        }
        text.push_str(&format!("\nThe answer is {answer}.\n"));
        text
    }

    fn standard_table(answer: &str) -> String {
        table_response(
            &[
                ("Invoice Matcher", "High"),
                ("Lead Scorer", "Medium"),
                ("Email Triage", "Low"),
            ],
            answer,
        )
    }

    #[test]
    fn test_unanimous_consensus() {
        let responses = vec![standard_table("Invoice Matcher"); 3];
        let result = count_votes(&responses, &ConsensusRule::new(2));

        assert!(result.had_consensus);
        assert_eq!(result.confidence_percent, 100);
        assert_eq!(result.consensus_strength, ConsensusStrength::Strong);
        assert_eq!(result.total_responses, 3);
        assert_eq!(result.votes_for_winner, 3);
        assert_eq!(result.final_answer, "Invoice Matcher");
        assert_eq!(result.all_candidates.len(), 3);
    }

    #[test]
    fn test_final_answer_takes_table_casing() {
        let responses = vec![
            standard_table("INVOICE MATCHER"),
            standard_table("**invoice matcher**"),
        ];
        let result = count_votes(&responses, &ConsensusRule::new(2));
        assert!(result.had_consensus);
        assert_eq!(result.final_answer, "Invoice Matcher");
    }

    #[test]
    fn test_split_vote_triggers_fallback() {
        let names = [
            "Invoice Matcher",
            "Lead Scorer",
            "Email Triage",
            "Expense Auditor",
            "Contract Reviewer",
        ];
        let responses: Vec<String> = names
            .iter()
            .map(|name| table_response(&[(name, "Medium")], name))
            .collect();

        let result = count_votes(&responses, &ConsensusRule::new(3));

        assert!(!result.had_consensus);
        assert_ne!(result.final_answer, NO_CONSENSUS);
        assert!(result.consensus_strength.to_string().starts_with("Fallback"));
        assert_eq!(result.all_candidates.len(), 5);
        assert_eq!(result.vote_confidence_percent, 20);
        assert!(result.confidence_percent <= 85);
    }

    #[test]
    fn test_fallback_confidence_is_capped_score() {
        let responses = vec![
            table_response(&[("Invoice Matcher", "High")], "Invoice Matcher"),
            table_response(&[("Lead Scorer", "Low")], "Lead Scorer"),
        ];
        let result = count_votes(&responses, &ConsensusRule::new(2));

        // High (40) + default impact (15) + default complexity (20)
        assert_eq!(result.fallback_score, Some(75));
        assert_eq!(result.confidence_percent, 75);
        assert_eq!(result.consensus_strength, ConsensusStrength::FallbackHigh);
        assert_eq!(result.final_answer, "Invoice Matcher");
    }

    #[test]
    fn test_empty_input() {
        let responses: Vec<String> = vec![];
        let result = count_votes(&responses, &ConsensusRule::new(2));

        assert_eq!(result.total_responses, 0);
        assert_eq!(result.final_answer, "No consensus");
        assert!(!result.had_consensus);
        assert!(result.all_candidates.is_empty());
        assert!(result.is_terminal_failure());
    }

    #[test]
    fn test_malformed_responses_excluded_from_total() {
        let responses = vec![
            standard_table("Invoice Matcher"),
            "I could not produce a table.".to_string(),
            standard_table("Invoice Matcher"),
        ];
        let result = count_votes(&responses, &ConsensusRule::new(2));

        assert_eq!(result.total_responses, 2);
        assert_eq!(result.confidence_percent, 100);
    }

    #[test]
    fn test_fuzzy_matches_counted() {
        let responses = vec![
            table_response(&[("Invoice Processing Bot", "High")], "Invoice Processing Bot"),
            table_response(&[("Invoice Processor Bot", "High")], "Invoice Processor Bot"),
        ];
        let result = count_votes(&responses, &ConsensusRule::new(2));

        assert!(result.had_consensus);
        assert_eq!(result.fuzzy_matches, 1);
        assert_eq!(result.final_answer, "Invoice Processing Bot");
    }

    #[test]
    fn test_winning_table_comes_from_first_voter() {
        let first = table_response(&[("Lead Scorer", "High"), ("Extra A", "Low")], "Lead Scorer");
        let second = table_response(&[("Lead Scorer", "High")], "Lead Scorer");
        let result = count_votes(&[first, second], &ConsensusRule::new(2));

        let names: Vec<_> = result.all_candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Lead Scorer", "Extra A"]);
    }

    #[test]
    fn test_tie_between_buckets_keeps_first_to_reach_count() {
        let responses = vec![
            standard_table("Lead Scorer"),
            standard_table("Email Triage"),
            standard_table("Email Triage"),
            standard_table("Lead Scorer"),
        ];
        let result = count_votes(&responses, &ConsensusRule::new(2));
        assert_eq!(result.final_answer, "Email Triage");
        assert_eq!(result.confidence_percent, 50);
        assert_eq!(result.consensus_strength, ConsensusStrength::Moderate);
    }

    #[test]
    fn test_votes_only_versus_votes_and_percent() {
        let responses = vec![
            standard_table("Invoice Matcher"),
            standard_table("Invoice Matcher"),
            standard_table("Lead Scorer"),
            standard_table("Email Triage"),
            standard_table("Email Triage"),
        ];

        let votes_only = count_votes(&responses, &ConsensusRule::new(2));
        assert!(votes_only.had_consensus);
        assert_eq!(votes_only.confidence_percent, 40);

        let with_percent = count_votes(&responses, &ConsensusRule::new(2).with_min_percent(50.0));
        assert!(!with_percent.had_consensus);
        assert!(with_percent.used_fallback());
    }

    #[test]
    fn test_extra_vote_for_winner_is_monotonic() {
        let mut responses = vec![
            standard_table("Invoice Matcher"),
            standard_table("Invoice Matcher"),
            standard_table("Lead Scorer"),
        ];
        let rule = ConsensusRule::new(2);
        let before = count_votes(&responses, &rule);

        responses.push(standard_table("Invoice Matcher"));
        let after = count_votes(&responses, &rule);

        assert!(before.had_consensus && after.had_consensus);
        assert!(after.confidence_percent >= before.confidence_percent);
    }

    #[test]
    fn test_consensus_on_table_without_complete_rows_is_terminal() {
        let short_rows = format!(
            "{HEADER}\n{SEPARATOR}\n| 1 | Lead Scorer | only |\n\nThe answer is Lead Scorer."
        );
        let result = count_votes(&vec![short_rows; 5], &ConsensusRule::new(3));

        assert!(result.had_consensus);
        assert_eq!(result.final_answer, "Lead Scorer");
        assert!(result.all_candidates.is_empty());
        assert!(result.is_terminal_failure());
    }

    #[test]
    fn test_parsed_without_rows_falls_back_to_terminal_failure() {
        let parsed = vec![
            ParsedResponse::new("Lead Scorer", vec![]),
            ParsedResponse::new("Email Triage", vec![]),
        ];
        let result = count_parsed_votes(&parsed, &ConsensusRule::new(2));

        assert_eq!(result.total_responses, 2);
        assert!(result.is_terminal_failure());
        assert_eq!(result.consensus_strength, ConsensusStrength::FallbackLow);
    }
}
