//! Response parsing for self-consistency voting.
//!
//! Each completion is expected to contain a markdown table of candidate
//! workflows and a line declaring the winner:
//!
//! ```text
//! | Rank | Name | Objective | Problems | How It Works | Tools | Metrics | Feasibility |
//! |------|------|-----------|----------|--------------|-------|---------|-------------|
//! | 1 | Invoice Matcher | ... | ... | ... | Zapier, Sheets | 40% reduction | High |
//!
//! The answer is Invoice Matcher.
//! ```
//!
//! Parsing is all-or-nothing: a completion either yields a [`ParsedResponse`]
//! or a [`MalformedResponse`] naming the first gate it failed. Rows with too
//! few cells are dropped without rejecting the response.

use super::entities::{Candidate, ParsedResponse};
use crate::text::strip_markup;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Columns in a complete row: rank, name, objective, problems, how-it-works,
/// tools, metrics, feasibility.
pub const TABLE_COLUMNS: usize = 8;

/// Header, separator and at least one data row.
const MIN_TABLE_LINES: usize = 3;

static SEPARATOR_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\|(?:\s*:?-{3,}:?\s*\|)*\s*:?-{3,}:?\s*\|?$").expect("invalid separator regex")
});

/// `The answer is X`, tolerating emphasis around the marker (`**The answer is:** X`).
static DECLARED_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)the answer is\**:?\**[ \t]+([^\r\n.!?]+)").expect("invalid answer regex")
});

/// Why a completion was excluded from voting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedResponse {
    #[error("missing table header row")]
    MissingTableHeader,

    #[error("table header has no Name column")]
    MissingNameColumn,

    #[error("missing table separator row")]
    MissingSeparatorRow,

    #[error("table has {0} rows, need header, separator and at least one data row")]
    TooFewTableRows(usize),

    #[error("missing \"The answer is ...\" declaration")]
    MissingDeclaredAnswer,
}

/// Parse one raw completion.
///
/// # Errors
///
/// Returns the [`MalformedResponse`] for the first validation gate that
/// fails. This is never fatal; callers exclude the completion and log the
/// reason.
///
/// # Example
///
/// ```
/// use consensus_domain::candidate::parsing::parse_response;
///
/// let raw = "\
/// | Rank | Name | Objective | Problems | How It Works | Tools | Metrics | Feasibility |
/// |---|---|---|---|---|---|---|---|
/// | 1 | Lead Scorer | Rank leads | Slow triage | Scores CRM leads | HubSpot, Zapier | 30% faster | High |
///
/// The answer is Lead Scorer.";
///
/// let parsed = parse_response(raw).unwrap();
/// assert_eq!(parsed.answer, "Lead Scorer");
/// assert_eq!(parsed.candidates[0].tools, vec!["HubSpot", "Zapier"]);
/// ```
pub fn parse_response(raw: &str) -> Result<ParsedResponse, MalformedResponse> {
    let lines: Vec<&str> = raw.lines().collect();

    let header_index = lines
        .iter()
        .position(|line| is_header_row(line))
        .ok_or(MalformedResponse::MissingTableHeader)?;

    let header_cells = split_cells(lines[header_index]);
    if !header_cells
        .iter()
        .any(|cell| strip_markup(cell).to_lowercase().contains("name"))
    {
        return Err(MalformedResponse::MissingNameColumn);
    }

    let table: Vec<&str> = lines[header_index..]
        .iter()
        .map(|line| line.trim())
        .take_while(|line| !line.is_empty())
        .filter(|line| line.starts_with('|'))
        .collect();

    if !table.iter().any(|line| SEPARATOR_ROW.is_match(line)) {
        return Err(MalformedResponse::MissingSeparatorRow);
    }

    if table.len() < MIN_TABLE_LINES {
        return Err(MalformedResponse::TooFewTableRows(table.len()));
    }

    let answer = DECLARED_ANSWER
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|answer| !answer.is_empty())
        .ok_or(MalformedResponse::MissingDeclaredAnswer)?;

    let candidates = table
        .iter()
        .skip(1)
        .filter(|line| !SEPARATOR_ROW.is_match(line))
        .filter_map(|line| parse_row(line))
        .collect();

    Ok(ParsedResponse::new(answer, candidates))
}

/// [`parse_response`] with the rejection reason discarded.
pub fn try_parse_response(raw: &str) -> Option<ParsedResponse> {
    parse_response(raw).ok()
}

fn is_header_row(line: &str) -> bool {
    let line = line.trim();
    if !line.starts_with('|') {
        return false;
    }
    split_cells(line).first().is_some_and(|first| {
        let first = strip_markup(first).to_lowercase();
        first == "rank" || first == "#"
    })
}

fn split_cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

fn parse_row(line: &str) -> Option<Candidate> {
    let cells = split_cells(line);
    if cells.len() < TABLE_COLUMNS {
        debug!(
            "Skipping table row with {} cells (need {}): {}",
            cells.len(),
            TABLE_COLUMNS,
            line
        );
        return None;
    }

    Some(
        Candidate::new(strip_markup(cells[1]))
            .with_rank(cells[0])
            .with_objective(cells[2])
            .with_problems(cells[3])
            .with_description(cells[4])
            .with_tools(split_list(cells[5]))
            .with_metrics(split_list(cells[6]))
            .with_feasibility(strip_markup(cells[7])),
    )
}

fn split_list(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}
