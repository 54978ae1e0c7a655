//! Final candidate selection
//!
//! Picks a fixed-size, duplicate-free, domain-diverse set of workflows from
//! the pooled candidates of every response.

pub mod category;
pub mod scoring;
pub mod selector;
pub mod semantic;
pub mod tier;

pub use category::WorkflowDomain;
pub use selector::{ScoredCandidate, score_pool, select_top_k};
pub use semantic::{Intent, PromptProfile};
pub use tier::ServiceTier;
