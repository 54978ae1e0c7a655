//! CLI command definitions

use clap::{Parser, ValueEnum};
use consensus_domain::ServiceTier;
use std::path::PathBuf;

/// Output format for consensus results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Consensus summary and every selected candidate
    Full,
    /// Only the final answer and the selected names
    Answer,
    /// JSON output
    Json,
}

impl From<OutputFormat> for consensus_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Answer => Self::Answer,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Service tier the selection is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Budget,
    Standard,
    Premium,
}

impl From<TierArg> for ServiceTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Budget => ServiceTier::Budget,
            TierArg::Standard => ServiceTier::Standard,
            TierArg::Premium => ServiceTier::Premium,
        }
    }
}

/// CLI arguments for consensus-engine
#[derive(Parser, Debug)]
#[command(name = "consensus-engine")]
#[command(author, version, about = "Self-consistency consensus over sampled LLM completions")]
#[command(long_about = r#"
Consensus Engine turns several completions of the same prompt, sampled at
different temperatures, into one recommendation.

The process has three phases:
1. Generation: one completion per temperature (with bounded retries)
2. Voting: declared answers are normalized, fuzzily matched and counted;
   without consensus every candidate is ranked by a heuristic score
3. Selection: the top K candidates are picked with domain diversity

Completions are replayed from --responses: files are sorted by name and
paired with the configured temperatures. `<name>.retryN.<ext>` files answer
the N-th retry of `<name>.<ext>`.

Configuration files are loaded from (in priority order):
1. CONSENSUS_* environment variables (e.g. CONSENSUS_SELECTION__SIZE=3)
2. --config <path>        Explicit config file
3. ./consensus.toml       Project-level config
4. ~/.config/consensus-engine/config.toml   Global config

Example:
  consensus-engine "Automate our invoice processing" --responses ./runs/42
  consensus-engine --prompt-file prompt.md --responses ./runs/42 -k 3 --tier budget
"#)]
pub struct Cli {
    /// The original user request (scored against during selection)
    pub request: Option<String>,

    /// Directory of recorded completions
    #[arg(short, long, value_name = "DIR")]
    pub responses: Option<PathBuf>,

    /// File holding the full generation prompt (defaults to the request)
    #[arg(long, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// System prompt sent with every generation
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Number of candidates to select
    #[arg(short = 'k', long = "top-k", value_name = "N")]
    pub top_k: Option<usize>,

    /// Service tier of the customer
    #[arg(long, value_enum)]
    pub tier: Option<TierArg>,

    /// Minimum votes for the plurality winner
    #[arg(long, value_name = "N")]
    pub min_votes: Option<usize>,

    /// Minimum share of parsed responses for the winner (0-100)
    #[arg(long, value_name = "PERCENT")]
    pub min_percent: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append result events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub result_log: Option<PathBuf>,
}
