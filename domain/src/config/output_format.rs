//! Output format value object

use serde::{Deserialize, Serialize};

/// How a run's result is rendered
///
/// This is a domain concept shared by the config file and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Consensus summary followed by every selected candidate (default)
    #[default]
    Full,
    /// The final answer and the selected names only
    Answer,
    /// JSON dump of the consensus and the selection
    Json,
}
