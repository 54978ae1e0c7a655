//! CLI entrypoint for Consensus Engine
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use consensus_application::{
    ConsensusParams, NoProgress, ProgressNotifier, ResultLogger, RunConsensusError,
    RunConsensusInput, RunConsensusUseCase,
};
use consensus_domain::{ConsensusRule, OutputFormat};
use consensus_infrastructure::{ConfigLoader, JsonlResultLogger, RecordedResponseGateway};
use consensus_presentation::{Cli, ConsoleFormatter, OutputConfig, ProgressReporter};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit code for a run that ended without any usable candidate
const EXIT_NO_CONSENSUS: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    let params = apply_overrides(file_config.to_params()?, &cli);

    let output_config = OutputConfig::resolve(
        file_config.output.format,
        cli.output.map(Into::into),
        file_config.output.color,
        cli.quiet,
    );
    if !output_config.color {
        colored::control::set_override(false);
    }

    // === Input ===
    let Some(request) = cli.request.clone() else {
        bail!("A request is required. Run with --help for usage.");
    };
    let prompt = match &cli.prompt_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file {}", path.display()))?,
        None => request.clone(),
    };
    let Some(responses_dir) = &cli.responses else {
        bail!("--responses <DIR> is required: no live provider is configured.");
    };

    // === Dependency Injection ===
    let gateway = Arc::new(RecordedResponseGateway::from_dir(responses_dir)?);
    if gateway.slot_count() != params.temperatures.len() {
        warn!(
            "{} recorded responses for {} temperatures; unmatched slots are ignored or fail",
            gateway.slot_count(),
            params.temperatures.len()
        );
    }

    let mut use_case = RunConsensusUseCase::new(gateway);
    if let Some(path) = cli.result_log.clone().or(file_config.logging.result_log.clone()) {
        match JsonlResultLogger::new(&path) {
            Some(logger) => {
                info!("Logging results to {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger) as Arc<dyn ResultLogger>);
            }
            None => warn!("Result logging disabled: cannot open {}", path.display()),
        }
    }

    let mut input = RunConsensusInput::new(prompt, params).with_request(request);
    if let Some(system_prompt) = cli
        .system_prompt
        .clone()
        .or(file_config.generation.system_prompt.clone())
    {
        input = input.with_system_prompt(system_prompt);
    }

    info!("Starting Consensus Engine");

    // Execute with or without progress reporting
    let progress: Box<dyn ProgressNotifier> = if output_config.show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(NoProgress)
    };

    let result = match use_case.execute_with_progress(input, progress.as_ref()).await {
        Ok(result) => result,
        Err(RunConsensusError::NoCandidates(responses)) => {
            eprintln!(
                "{} none of the {} parsed responses produced a usable candidate",
                "No consensus:".red().bold(),
                responses
            );
            return Ok(ExitCode::from(EXIT_NO_CONSENSUS));
        }
        Err(e) => return Err(e.into()),
    };

    // Output results
    let output = match output_config.format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(ExitCode::SUCCESS)
}

/// CLI flags take precedence over every configuration source
fn apply_overrides(mut params: ConsensusParams, cli: &Cli) -> ConsensusParams {
    if let Some(k) = cli.top_k {
        params = params.with_selection_size(k);
    }
    if let Some(tier) = cli.tier {
        params = params.with_tier(tier.into());
    }
    if cli.min_votes.is_some() || cli.min_percent.is_some() {
        let rule = ConsensusRule {
            min_votes: cli.min_votes.unwrap_or(params.rule.min_votes),
            min_percent: cli.min_percent.or(params.rule.min_percent),
        };
        params = params.with_rule(rule);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::ServiceTier;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("consensus-engine").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_overrides_keep_unset_rule_fields() {
        let params = ConsensusParams::default().with_rule(ConsensusRule {
            min_votes: 4,
            min_percent: Some(60.0),
        });

        let params = apply_overrides(params, &cli(&["--min-votes", "2"]));
        assert_eq!(params.rule.min_votes, 2);
        assert_eq!(params.rule.min_percent, Some(60.0));

        let params = apply_overrides(params, &cli(&["--min-percent", "75"]));
        assert_eq!(params.rule.min_votes, 2);
        assert_eq!(params.rule.min_percent, Some(75.0));
    }

    #[test]
    fn test_overrides_selection_flags() {
        let params = apply_overrides(
            ConsensusParams::default(),
            &cli(&["-k", "3", "--tier", "premium"]),
        );
        assert_eq!(params.selection_size, 3);
        assert_eq!(params.tier, ServiceTier::Premium);
        assert_eq!(params.rule, ConsensusParams::default().rule);
    }

    #[test]
    fn test_no_flags_leave_params_untouched() {
        let params = apply_overrides(ConsensusParams::default(), &cli(&[]));
        assert_eq!(params, ConsensusParams::default());
    }
}
