//! Application layer for consensus-engine
//!
//! This crate contains the use case, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ConsensusParams;
pub use ports::{
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    result_logger::{NoResultLogger, ResultEvent, ResultLogger},
};
pub use use_cases::run_consensus::{
    GenerationRecord, RunConsensusError, RunConsensusInput, RunConsensusOutput,
    RunConsensusUseCase,
};
