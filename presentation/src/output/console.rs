//! Console output formatter for consensus results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use consensus_application::RunConsensusOutput;
use consensus_domain::{Candidate, ConsensusResult, ConsensusStrength};

/// Formats consensus results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &RunConsensusOutput) -> String {
        let consensus = result.consensus();
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Consensus Results"));
        output.push('\n');

        // Request
        output.push_str(&format!(
            "{} {}\n\n",
            "Request:".cyan().bold(),
            result.outcome.request
        ));

        // Consensus
        output.push_str(&Self::section_header("Consensus"));
        output.push_str(&Self::consensus_summary(consensus));

        // Generations (only when something went wrong)
        if result.rejected_count() > 0 {
            output.push_str(&Self::section_header("Rejected Generations"));
            for generation in result.generations.iter().filter(|g| !g.is_accepted()) {
                output.push_str(&format!(
                    "  {} T={} after {} attempts: {}\n",
                    "x".red(),
                    generation.temperature,
                    generation.attempts,
                    generation.rejection.as_deref().unwrap_or("unknown")
                ));
            }
        }

        // Selection
        output.push_str(&Self::section_header(&format!(
            "Selected Workflows ({})",
            result.selection().len()
        )));
        for (i, candidate) in result.selection().iter().enumerate() {
            output.push_str(&Self::candidate_block(i + 1, candidate));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &RunConsensusOutput) -> String {
        let value = serde_json::json!({
            "request": result.outcome.request,
            "consensus": result.consensus(),
            "selection": result.selection(),
            "generations": result.generations,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer and selected names only
    pub fn format_answer_only(result: &RunConsensusOutput) -> String {
        let mut output = format!(
            "{} {}\n",
            "Answer:".bold(),
            result.consensus().final_answer
        );
        for name in result.outcome.selected_names() {
            output.push_str(&format!("  * {}\n", name));
        }
        output
    }

    fn consensus_summary(consensus: &ConsensusResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "  {:<14} {}\n",
            "Answer:",
            consensus.final_answer.bold()
        ));
        output.push_str(&format!(
            "  {:<14} {}/{} {}\n",
            "Votes:",
            consensus.votes_for_winner,
            consensus.total_responses,
            Self::vote_bar(consensus.votes_for_winner, consensus.total_responses)
        ));
        output.push_str(&format!(
            "  {:<14} {}%\n",
            "Confidence:", consensus.confidence_percent
        ));
        output.push_str(&format!(
            "  {:<14} {}\n",
            "Strength:",
            Self::strength_label(consensus.consensus_strength)
        ));
        if consensus.fuzzy_matches > 0 {
            output.push_str(&format!(
                "  {:<14} {}\n",
                "Fuzzy matches:", consensus.fuzzy_matches
            ));
        }
        if let Some(score) = consensus.fallback_score {
            output.push_str(&format!(
                "  {}\n",
                format!(
                    "No consensus among votes ({}% for the leader); ranked by score {}",
                    consensus.vote_confidence_percent, score
                )
                .yellow()
            ));
        }

        output
    }

    fn candidate_block(position: usize, candidate: &Candidate) -> String {
        let mut output = format!(
            "\n{} {}",
            format!("{}.", position).yellow().bold(),
            candidate.name.bold()
        );
        if !candidate.feasibility.is_empty() {
            output.push_str(&format!(" [{}]", candidate.feasibility.dimmed()));
        }
        output.push('\n');

        if !candidate.objective.is_empty() {
            output.push_str(&format!("   {}\n", candidate.objective));
        }
        if !candidate.tools.is_empty() {
            output.push_str(&format!(
                "   {} {}\n",
                "Tools:".cyan(),
                candidate.tools.join(", ")
            ));
        }
        if !candidate.metrics.is_empty() {
            output.push_str(&format!(
                "   {} {}\n",
                "Metrics:".cyan(),
                candidate.metrics.join(", ")
            ));
        }

        output
    }

    fn strength_label(strength: ConsensusStrength) -> ColoredString {
        match strength {
            ConsensusStrength::Strong => strength.as_str().green().bold(),
            ConsensusStrength::Moderate => strength.as_str().yellow(),
            ConsensusStrength::FallbackHigh | ConsensusStrength::FallbackMedium => {
                strength.as_str().yellow()
            }
            ConsensusStrength::Weak | ConsensusStrength::FallbackLow => strength.as_str().red(),
        }
    }

    /// `[●●●○○]` with one dot per parsed response
    pub fn vote_bar(votes: usize, total: usize) -> String {
        let filled = votes.min(total);
        format!("[{}{}]", "●".repeat(filled), "○".repeat(total - filled))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &RunConsensusOutput) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &RunConsensusOutput) -> String {
        Self::format_json(result)
    }

    fn format_answer_only(&self, result: &RunConsensusOutput) -> String {
        Self::format_answer_only(result)
    }
}
