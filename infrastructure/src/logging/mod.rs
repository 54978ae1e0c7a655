//! Structured result logging.
//!
//! Provides [`JsonlResultLogger`], a JSONL file writer that implements
//! the [`ResultLogger`](consensus_application::ResultLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlResultLogger;
