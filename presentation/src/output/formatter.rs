//! Output formatter trait

use consensus_application::RunConsensusOutput;

/// Trait for formatting consensus results
pub trait OutputFormatter {
    /// Format the complete result
    fn format(&self, result: &RunConsensusOutput) -> String;

    /// Format as JSON
    fn format_json(&self, result: &RunConsensusOutput) -> String;

    /// Format the final answer and selected names only (concise output)
    fn format_answer_only(&self, result: &RunConsensusOutput) -> String;
}
