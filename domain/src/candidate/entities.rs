//! Candidate entities extracted from model completions.

use crate::text::normalize;
use serde::{Deserialize, Serialize};

/// Coarse feasibility rating of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feasibility {
    High,
    Medium,
    Low,
}

impl Feasibility {
    /// Interpret a free-text feasibility cell.
    ///
    /// Accepts the plain ratings plus the synonyms models tend to use
    /// ("easy", "moderate", "hard", "difficult"). Returns `None` when nothing
    /// recognizable is present.
    pub fn classify(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        if lower.contains("high") || lower.contains("easy") {
            Some(Feasibility::High)
        } else if lower.contains("medium") || lower.contains("moderate") {
            Some(Feasibility::Medium)
        } else if lower.contains("low") || lower.contains("hard") || lower.contains("difficult") {
            Some(Feasibility::Low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Feasibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feasibility::High => write!(f, "High"),
            Feasibility::Medium => write!(f, "Medium"),
            Feasibility::Low => write!(f, "Low"),
        }
    }
}

/// One proposed workflow, built from a single table row.
///
/// Immutable once parsed; voting and selection only reorder or filter.
///
/// # Example
///
/// ```
/// use consensus_domain::Candidate;
///
/// let candidate = Candidate::new("**Invoice Matcher**")
///     .with_tools(["Zapier", "Google Sheets"])
///     .with_feasibility("High");
/// assert_eq!(candidate.normalized_name(), "invoice matcher");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Rank cell as written by the model
    pub rank: String,
    /// Display label; the vote key after normalization
    pub name: String,
    pub objective: String,
    /// Problems the workflow addresses
    pub problems: String,
    /// How it works
    pub description: String,
    pub tools: Vec<String>,
    /// Free-text impact claims ("40% reduction", "3x faster")
    pub metrics: Vec<String>,
    /// Raw feasibility cell, empty when unset
    pub feasibility: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = rank.into();
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn with_problems(mut self, problems: impl Into<String>) -> Self {
        self.problems = problems.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_feasibility(mut self, feasibility: impl Into<String>) -> Self {
        self.feasibility = feasibility.into();
        self
    }

    /// Canonical form of the name, used for vote keys and duplicate checks.
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }

    pub fn feasibility_level(&self) -> Option<Feasibility> {
        Feasibility::classify(&self.feasibility)
    }

    /// Name, objective and description joined for keyword matching.
    pub fn summary_text(&self) -> String {
        format!("{} {} {}", self.name, self.objective, self.description)
    }
}

/// The parsed form of one raw model completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Label declared after "The answer is"
    pub answer: String,
    /// Table rows in their original order
    pub candidates: Vec<Candidate>,
}

impl ParsedResponse {
    pub fn new(answer: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            answer: answer.into(),
            candidates,
        }
    }

    pub fn normalized_answer(&self) -> String {
        normalize(&self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility_classify() {
        assert_eq!(Feasibility::classify("High"), Some(Feasibility::High));
        assert_eq!(Feasibility::classify("easy win"), Some(Feasibility::High));
        assert_eq!(Feasibility::classify("Moderate"), Some(Feasibility::Medium));
        assert_eq!(Feasibility::classify("difficult"), Some(Feasibility::Low));
        assert_eq!(Feasibility::classify(""), None);
        assert_eq!(Feasibility::classify("unknown"), None);
    }

    #[test]
    fn test_candidate_builder() {
        let candidate = Candidate::new("Lead Scorer")
            .with_rank("1")
            .with_objective("Prioritize inbound leads")
            .with_tools(["HubSpot", "OpenAI API"])
            .with_metrics(["30% more conversions"])
            .with_feasibility("Medium");

        assert_eq!(candidate.tools.len(), 2);
        assert_eq!(candidate.feasibility_level(), Some(Feasibility::Medium));
        assert!(candidate.summary_text().contains("Prioritize inbound leads"));
    }

    #[test]
    fn test_parsed_response_normalized_answer() {
        let parsed = ParsedResponse::new("**The Lead Scorer**.", vec![]);
        assert_eq!(parsed.normalized_answer(), "lead scorer");
    }
}
