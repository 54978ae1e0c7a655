//! Gateway adapters
//!
//! Live LLM providers are wired in by the embedding application; this
//! crate ships the recorded-response adapter used for replays and tests.

pub mod recorded;

pub use recorded::{RecordedResponseError, RecordedResponseGateway};
