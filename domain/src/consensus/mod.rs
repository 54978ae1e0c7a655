//! Self-consistency consensus
//!
//! Several completions of the same prompt, sampled at different
//! temperatures, each declare a winning workflow. This module turns those
//! declarations into one answer.
//!
//! # Flow
//!
//! ```text
//!  raw completions
//!        │  parse_response (per completion)
//!        ▼
//!  ParsedResponse* ──► VoteTally (normalize + fuzzy match)
//!                            │
//!              ┌─────────────┴─────────────┐
//!        rule satisfied               rule not satisfied
//!              │                           │
//!     winner's own table          rank_by_score over every table
//!              │                           │
//!              └───────────► ConsensusResult
//! ```

pub mod aggregator;
pub mod fallback;
pub mod result;
pub mod rule;
pub mod strength;
pub mod vote;

pub use aggregator::{count_parsed_votes, count_votes};
pub use fallback::{FallbackRanking, FallbackScore, RankedCandidate, rank_by_score};
pub use result::{ConsensusResult, NO_CONSENSUS};
pub use rule::ConsensusRule;
pub use strength::ConsensusStrength;
pub use vote::{CastOutcome, VoteBucket, VoteTally};
