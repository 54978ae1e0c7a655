//! Run-level concepts: phases, sampling plan and the combined outcome.

pub mod outcome;
pub mod phase;
pub mod plan;

pub use outcome::WorkflowOutcome;
pub use phase::Phase;
pub use plan::GenerationPlan;
