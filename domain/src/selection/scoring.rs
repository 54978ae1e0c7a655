//! Per-candidate scoring factors for selection.

use super::tier::ServiceTier;
use crate::candidate::{Candidate, Feasibility};
use crate::text::keywords::tokenize;
use regex::Regex;
use std::sync::LazyLock;

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("invalid percentage regex"));
static MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*x\b").expect("invalid multiplier regex"));

const ACCURACY_TERMS: &[&str] = &["accuracy", "accurate", "precision", "precise"];
const REDUCTION_TERMS: &[&str] = &[
    "reduction", "reduce", "saving", "save", "cut", "decrease", "less", "fewer", "lower",
    "faster",
];

const NO_CODE_TOOLS: &[&str] = &["zapier", "n8n", "make", "ifttt"];
const ADVANCED_TOOLS: &[&str] = &["custom", "api", "ml", "ai"];

pub const MIN_IMPACT: f64 = 1.0;
pub const MAX_IMPACT: f64 = 5.0;
pub const MAX_TOOL_SCORE: f64 = 1.2;

/// Weight of the candidate's feasibility under `tier`
///
/// High 1.0, Low 0.3, Medium depends on tier (0.6 / 0.75 / 0.9). An
/// unrecognized rating is weighed as Medium.
pub fn feasibility_weight(candidate: &Candidate, tier: ServiceTier) -> f64 {
    match candidate.feasibility_level() {
        Some(Feasibility::High) => 1.0,
        Some(Feasibility::Low) => 0.3,
        Some(Feasibility::Medium) | None => tier.medium_feasibility_weight(),
    }
}

/// Strongest numeric impact claim among `metrics`, in `[1.0, 5.0]`
///
/// - accuracy percentages: `(pct - 70) / 20`
/// - reduction or savings percentages: `pct / 50`
/// - other percentages: `pct / 100`
/// - multipliers (`3x`): `n / 2`
pub fn metrics_impact(metrics: &[String]) -> f64 {
    let best = metrics
        .iter()
        .flat_map(|metric| metric_values(metric))
        .fold(MIN_IMPACT, f64::max);
    best.clamp(MIN_IMPACT, MAX_IMPACT)
}

fn metric_values(metric: &str) -> Vec<f64> {
    let lower = metric.to_lowercase();
    let is_accuracy = ACCURACY_TERMS.iter().any(|term| lower.contains(term));
    let is_reduction = REDUCTION_TERMS.iter().any(|term| lower.contains(term));

    let percentages = PERCENTAGE
        .captures_iter(&lower)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .map(|pct| {
            if is_accuracy {
                (pct - 70.0) / 20.0
            } else if is_reduction {
                pct / 50.0
            } else {
                pct / 100.0
            }
        });

    let multipliers = MULTIPLIER
        .captures_iter(&lower)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .map(|n| n / 2.0);

    percentages.chain(multipliers).collect()
}

/// Practicality of the tool stack under `tier`, in `[0.7, 1.2]`
///
/// Fewer tools score higher. Budget customers get +0.2 for any no-code tool,
/// premium customers +0.15 for any custom/API/ML/AI tool.
pub fn tool_practicality(tools: &[String], tier: ServiceTier) -> f64 {
    let base: f64 = match tools.len() {
        0..=3 => 1.0,
        4..=5 => 0.85,
        _ => 0.7,
    };

    let bonus = match tier {
        ServiceTier::Budget if any_tool_matches(tools, NO_CODE_TOOLS) => 0.2,
        ServiceTier::Premium if any_tool_matches(tools, ADVANCED_TOOLS) => 0.15,
        _ => 0.0,
    };

    (base + bonus).min(MAX_TOOL_SCORE)
}

fn any_tool_matches(tools: &[String], allowlist: &[&str]) -> bool {
    tools
        .iter()
        .flat_map(|tool| tokenize(tool).collect::<Vec<_>>())
        .any(|token| allowlist.contains(&token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_feasibility_weight_by_tier() {
        let high = Candidate::new("a").with_feasibility("High");
        let medium = Candidate::new("b").with_feasibility("Medium");
        let low = Candidate::new("c").with_feasibility("Low");
        let unset = Candidate::new("d");

        assert_eq!(feasibility_weight(&high, ServiceTier::Budget), 1.0);
        assert_eq!(feasibility_weight(&low, ServiceTier::Premium), 0.3);
        assert_eq!(feasibility_weight(&medium, ServiceTier::Budget), 0.6);
        assert_eq!(feasibility_weight(&medium, ServiceTier::Standard), 0.75);
        assert_eq!(feasibility_weight(&medium, ServiceTier::Premium), 0.9);
        assert_eq!(feasibility_weight(&unset, ServiceTier::Standard), 0.75);
    }

    #[test]
    fn test_metrics_impact_contexts() {
        assert_eq!(metrics_impact(&strings(&["95% accuracy"])), 1.25);
        assert_eq!(metrics_impact(&strings(&["80% cost reduction"])), 1.6);
        assert_eq!(metrics_impact(&strings(&["300% ROI"])), 3.0);
        assert_eq!(metrics_impact(&strings(&["6x faster"])), 3.0);
    }

    #[test]
    fn test_metrics_impact_takes_maximum_and_clamps() {
        let metrics = strings(&["40% reduction", "4x throughput"]);
        assert_eq!(metrics_impact(&metrics), 2.0);
        assert_eq!(metrics_impact(&strings(&["20x faster"])), MAX_IMPACT);
        assert_eq!(metrics_impact(&strings(&["10% uplift"])), MIN_IMPACT);
        assert_eq!(metrics_impact(&[]), MIN_IMPACT);
        assert_eq!(metrics_impact(&strings(&["happier staff"])), MIN_IMPACT);
    }

    #[test]
    fn test_tool_practicality_counts() {
        assert_eq!(tool_practicality(&strings(&["Sheets"]), ServiceTier::Standard), 1.0);
        assert_eq!(
            tool_practicality(&strings(&["a", "b", "c", "d"]), ServiceTier::Standard),
            0.85
        );
        assert_eq!(
            tool_practicality(&strings(&["a", "b", "c", "d", "e", "f"]), ServiceTier::Standard),
            0.7
        );
    }

    #[test]
    fn test_tool_practicality_tier_bonus() {
        let no_code = strings(&["Zapier", "Google Sheets"]);
        assert_eq!(tool_practicality(&no_code, ServiceTier::Budget), MAX_TOOL_SCORE);
        assert_eq!(tool_practicality(&no_code, ServiceTier::Premium), 1.0);

        let advanced = strings(&["OpenAI API", "Postgres"]);
        assert_eq!(tool_practicality(&advanced, ServiceTier::Premium), 1.15);

        // "Mailchimp" must not count as an AI tool
        let mail = strings(&["Mailchimp"]);
        assert_eq!(tool_practicality(&mail, ServiceTier::Premium), 1.0);
    }
}
