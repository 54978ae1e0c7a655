//! Domain layer for consensus-engine
//!
//! This crate contains the core business logic: parsing completions,
//! voting, fallback ranking and top-K selection. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Self-consistency
//!
//! The same prompt is sampled several times at different temperatures.
//! Each completion is a markdown table of candidate workflows plus a
//! declared answer:
//!
//! - **Voting**: declared answers are normalized, fuzzily consolidated and
//!   counted; a [`ConsensusRule`] decides whether the plurality is trusted
//! - **Fallback**: without consensus every candidate is ranked by a
//!   feasibility / impact / complexity heuristic
//!
//! ## Selection
//!
//! The pooled candidates are scored against the original request and a
//! [`ServiceTier`], then picked greedily with domain diversity.

pub mod candidate;
pub mod config;
pub mod consensus;
pub mod core;
pub mod selection;
pub mod text;
pub mod workflow;

// Re-export commonly used types
pub use candidate::{
    Candidate, Feasibility, MalformedResponse, ParsedResponse, parse_response, try_parse_response,
};
pub use config::OutputFormat;
pub use consensus::{
    ConsensusResult, ConsensusRule, ConsensusStrength, FallbackRanking, NO_CONSENSUS,
    count_parsed_votes, count_votes, rank_by_score,
};
pub use core::error::DomainError;
pub use selection::{ServiceTier, WorkflowDomain, select_top_k};
pub use workflow::{GenerationPlan, Phase, WorkflowOutcome};
