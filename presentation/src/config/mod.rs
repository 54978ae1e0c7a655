//! Presentation-level configuration
//!
//! Configuration for output formatting and progress display, resolved from
//! the config file and the command line.

use consensus_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// The CLI format wins over the file format, which wins over the default
    pub fn resolve(
        file_format: Option<OutputFormat>,
        cli_format: Option<OutputFormat>,
        color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format.or(file_format).unwrap_or_default();
        Self {
            format,
            color,
            // Progress bars would corrupt machine-readable output
            show_progress: !quiet && format != OutputFormat::Json,
        }
    }
}
