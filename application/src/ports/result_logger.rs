//! Port for structured result logging.
//!
//! Defines the [`ResultLogger`] trait for recording the outcome of each run
//! (rejected generations, the consensus, the final selection) to an audit
//! log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures results in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// A structured result event for logging.
pub struct ResultEvent {
    /// Event type identifier (e.g., "consensus_reached", "fallback_used").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ResultEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging result events.
///
/// The `log` method is synchronous and non-fallible; a broken log must
/// never fail a run.
pub trait ResultLogger: Send + Sync {
    /// Record a result event.
    fn log(&self, event: ResultEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoResultLogger;

impl ResultLogger for NoResultLogger {
    fn log(&self, _event: ResultEvent) {}
}
