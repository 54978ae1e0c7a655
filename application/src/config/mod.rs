//! Application-level configuration.
//!
//! - [`ConsensusParams`]: sampling, voting and selection control for a run

pub mod consensus_params;

pub use consensus_params::{ConsensusParams, DEFAULT_SELECTION_SIZE};
