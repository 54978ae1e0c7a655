//! Combined outcome of a run

use crate::candidate::Candidate;
use crate::consensus::ConsensusResult;
use serde::{Deserialize, Serialize};

/// What the report renderer consumes: the consensus and the final picks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    /// The original user request the selection was scored against
    pub request: String,
    pub consensus: ConsensusResult,
    pub selection: Vec<Candidate>,
}

impl WorkflowOutcome {
    pub fn new(
        request: impl Into<String>,
        consensus: ConsensusResult,
        selection: Vec<Candidate>,
    ) -> Self {
        Self {
            request: request.into(),
            consensus,
            selection,
        }
    }

    pub fn selected_names(&self) -> Vec<&str> {
        self.selection.iter().map(|c| c.name.as_str()).collect()
    }
}
