//! Infrastructure layer for consensus-engine
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConsensusConfig, FileGenerationConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileSelectionConfig,
};
pub use logging::JsonlResultLogger;
pub use providers::{RecordedResponseError, RecordedResponseGateway};
