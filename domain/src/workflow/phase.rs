//! Phases of a self-consistency run

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Parallel completions at every configured temperature
    Generation,
    /// Parsing and plurality voting (with fallback ranking)
    Voting,
    /// Top-K selection for the report
    Selection,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Generation => "generation",
            Phase::Voting => "voting",
            Phase::Selection => "selection",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Generation => "Parallel Generation",
            Phase::Voting => "Consensus Voting",
            Phase::Selection => "Candidate Selection",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
