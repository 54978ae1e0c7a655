//! Semantic relevance of a candidate to the original request.
//!
//! Keyword overlap, weighted by `ln(1 + count)` on both sides and normalized
//! by the prompt's total weight, mapped onto `[0.5, 3.0]`. Sharing a broad
//! intent (documents, data, customers, finance) doubles the score.

use crate::candidate::Candidate;
use crate::text::keywords::{keyword_weights, tokenize};
use std::collections::{HashMap, HashSet};

pub const MIN_RELEVANCE: f64 = 0.5;
pub const MAX_RELEVANCE: f64 = 3.0;
const RELEVANCE_SPAN: f64 = 2.5;
const SHARED_INTENT_MULTIPLIER: f64 = 2.0;

/// Broad focus of a request or candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    DocumentFocus,
    DataFocus,
    CustomerFocus,
    FinanceFocus,
}

const INTENT_STEMS: &[(Intent, &[&str])] = &[
    (
        Intent::DocumentFocus,
        &["document", "contract", "pdf", "paperwork", "form"],
    ),
    (
        Intent::DataFocus,
        &["data", "spreadsheet", "database", "record", "entry"],
    ),
    (
        Intent::CustomerFocus,
        &["customer", "client", "support", "inquir", "ticket"],
    ),
    (
        Intent::FinanceFocus,
        &["invoice", "payment", "billing", "expense", "accounting"],
    ),
];

/// Intents whose stems start any token of `text`
pub fn detect_intents(text: &str) -> HashSet<Intent> {
    let tokens: Vec<String> = tokenize(text).collect();
    INTENT_STEMS
        .iter()
        .filter(|(_, stems)| {
            tokens
                .iter()
                .any(|token| stems.iter().any(|stem| token.starts_with(stem)))
        })
        .map(|(intent, _)| *intent)
        .collect()
}

/// Keyword profile of the original request, computed once per selection
#[derive(Debug, Clone)]
pub struct PromptProfile {
    weights: HashMap<String, f64>,
    total_weight: f64,
    intents: HashSet<Intent>,
}

impl PromptProfile {
    pub fn new(prompt: &str) -> Self {
        let weights = keyword_weights(prompt);
        let total_weight = weights.values().sum();
        Self {
            weights,
            total_weight,
            intents: detect_intents(prompt),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Relevance of `candidate` in `[0.5, 3.0]`; `0.5` flat without overlap
    pub fn relevance(&self, candidate: &Candidate) -> f64 {
        if self.total_weight <= 0.0 {
            return MIN_RELEVANCE;
        }

        let text = candidate.summary_text();
        let candidate_weights = keyword_weights(&text);

        let overlap: f64 = self
            .weights
            .iter()
            .filter_map(|(keyword, prompt_weight)| {
                candidate_weights
                    .get(keyword)
                    .map(|candidate_weight| prompt_weight * candidate_weight)
            })
            .sum();

        if overlap <= 0.0 {
            return MIN_RELEVANCE;
        }

        let normalized = overlap / self.total_weight;
        let mut score = (MIN_RELEVANCE + normalized * RELEVANCE_SPAN).min(MAX_RELEVANCE);

        if !self.intents.is_disjoint(&detect_intents(&text)) {
            score = (score * SHARED_INTENT_MULTIPLIER).min(MAX_RELEVANCE);
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_intents() {
        let intents = detect_intents("Automate invoices and customer inquiries");
        assert!(intents.contains(&Intent::FinanceFocus));
        assert!(intents.contains(&Intent::CustomerFocus));
        assert!(!intents.contains(&Intent::DocumentFocus));
    }

    #[test]
    fn test_no_overlap_is_flat_minimum() {
        let profile = PromptProfile::new("Automate invoice reconciliation");
        let candidate = Candidate::new("Social Media Scheduler").with_objective("Post content");
        assert_eq!(profile.relevance(&candidate), MIN_RELEVANCE);
    }

    #[test]
    fn test_empty_prompt_is_flat_minimum() {
        let profile = PromptProfile::new("");
        assert!(profile.is_empty());
        assert_eq!(profile.relevance(&Candidate::new("Invoice Matcher")), MIN_RELEVANCE);
    }

    #[test]
    fn test_overlap_raises_relevance() {
        let profile = PromptProfile::new("Automate reconciliation of vendor statements");
        let related = Candidate::new("Vendor Reconciliation")
            .with_objective("Match vendor statements automatically");
        let unrelated = Candidate::new("Social Scheduler");

        let related_score = profile.relevance(&related);
        assert!(related_score > MIN_RELEVANCE);
        assert!(related_score <= MAX_RELEVANCE);
        assert_eq!(profile.relevance(&unrelated), MIN_RELEVANCE);
    }

    #[test]
    fn test_shared_intent_doubles_and_clamps() {
        let prompt = "We drown in invoices; please automate invoice approval";
        let profile = PromptProfile::new(prompt);

        let candidate = Candidate::new("Invoice Approval Router")
            .with_objective("Route each invoice for approval");
        // ~1.4 from overlap alone, doubled by the shared finance intent
        let score = profile.relevance(&candidate);
        assert!(score > 2.5 && score <= MAX_RELEVANCE, "score was {score}");

        let saturated = PromptProfile::new("invoice")
            .relevance(&Candidate::new("Invoice").with_objective("invoice invoice"));
        assert_eq!(saturated, MAX_RELEVANCE);
    }
}
