//! Run Consensus use case
//!
//! Orchestrates the full self-consistency flow: parallel generation with
//! bounded retries, voting (or fallback ranking) and top-K selection.

use crate::config::ConsensusParams;
use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::result_logger::{NoResultLogger, ResultEvent, ResultLogger};
use consensus_domain::{
    Candidate, ConsensusResult, DomainError, GenerationPlan, ParsedResponse, Phase,
    WorkflowOutcome, count_parsed_votes, parse_response, select_top_k,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a consensus run
#[derive(Error, Debug)]
pub enum RunConsensusError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] DomainError),

    #[error("All {0} generations failed or were malformed")]
    AllGenerationsFailed(usize),

    #[error("No consensus: no candidate could be determined from {0} responses")]
    NoCandidates(usize),
}

/// Input for the RunConsensus use case
#[derive(Debug, Clone)]
pub struct RunConsensusInput {
    /// Prompt sent to every generation
    pub prompt: String,
    /// Base system prompt; retry warnings are appended to it
    pub system_prompt: Option<String>,
    /// Original user request, used for semantic scoring during selection
    pub request: String,
    pub params: ConsensusParams,
}

impl RunConsensusInput {
    /// The prompt doubles as the request until [`with_request`](Self::with_request) says otherwise
    pub fn new(prompt: impl Into<String>, params: ConsensusParams) -> Self {
        let prompt = prompt.into();
        Self {
            request: prompt.clone(),
            prompt,
            system_prompt: None,
            params,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.request = request.into();
        self
    }
}

/// What happened to one temperature slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub temperature: f64,
    /// Requests issued for this slot, retries included
    pub attempts: usize,
    /// Reason of the last rejection, `None` when the completion was accepted
    pub rejection: Option<String>,
}

impl GenerationRecord {
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Output of the RunConsensus use case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConsensusOutput {
    pub outcome: WorkflowOutcome,
    pub generations: Vec<GenerationRecord>,
}

impl RunConsensusOutput {
    pub fn consensus(&self) -> &ConsensusResult {
        &self.outcome.consensus
    }

    pub fn selection(&self) -> &[Candidate] {
        &self.outcome.selection
    }

    pub fn rejected_count(&self) -> usize {
        self.generations.iter().filter(|g| !g.is_accepted()).count()
    }
}

/// Use case for running a self-consistency consensus
pub struct RunConsensusUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    logger: Arc<dyn ResultLogger>,
}

impl<G: LlmGateway + 'static> RunConsensusUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoResultLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ResultLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunConsensusInput,
    ) -> Result<RunConsensusOutput, RunConsensusError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunConsensusInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunConsensusOutput, RunConsensusError> {
        let plan = input.params.validate()?;

        info!(
            "Starting consensus run with {} generations ({})",
            plan.len(),
            input.params.rule
        );

        // Phase 1: Generation
        let (parsed, generations) = self.phase_generation(&input, &plan, progress).await;
        if parsed.is_empty() {
            return Err(RunConsensusError::AllGenerationsFailed(plan.len()));
        }

        // Phase 2: Voting
        let consensus = self.phase_voting(&input, &parsed, progress);
        if consensus.is_terminal_failure() {
            return Err(RunConsensusError::NoCandidates(parsed.len()));
        }

        // Phase 3: Selection
        let selection = self.phase_selection(&input, &consensus, &parsed, progress);

        Ok(RunConsensusOutput {
            outcome: WorkflowOutcome::new(input.request, consensus, selection),
            generations,
        })
    }

    /// Phase 1: one completion per temperature, then sequential retries
    async fn phase_generation(
        &self,
        input: &RunConsensusInput,
        plan: &GenerationPlan,
        progress: &dyn ProgressNotifier,
    ) -> (Vec<ParsedResponse>, Vec<GenerationRecord>) {
        info!("Phase 1: Generation");
        progress.on_phase_start(&Phase::Generation, plan.len());

        let requests: Vec<GenerationRequest> = plan
            .temperatures()
            .iter()
            .enumerate()
            .map(|(slot, temperature)| {
                GenerationRequest::new(&input.prompt, *temperature)
                    .with_system_prompt(input.system_prompt.clone())
                    .with_slot(slot)
            })
            .collect();

        let results = self.gateway.generate_parallel(&requests).await;

        let mut parsed = Vec::new();
        let mut records = Vec::new();

        // Slots are settled in temperature order so voting tie-breaks are reproducible
        for (request, result) in requests.iter().zip(results) {
            let (outcome, attempts) = match validate_completion(result) {
                Ok(response) => (Ok(response), 1),
                Err(reason) => {
                    self.retry_generation(input, request, reason, progress)
                        .await
                }
            };

            match outcome {
                Ok(response) => {
                    debug!(
                        "Generation at temperature {} accepted: {}",
                        request.temperature, response.answer
                    );
                    progress.on_task_complete(&Phase::Generation, request.temperature, true);
                    parsed.push(response);
                    records.push(GenerationRecord {
                        temperature: request.temperature,
                        attempts,
                        rejection: None,
                    });
                }
                Err(reason) => {
                    warn!(
                        "Excluding generation at temperature {} after {} attempts: {}",
                        request.temperature, attempts, reason
                    );
                    progress.on_task_complete(&Phase::Generation, request.temperature, false);
                    self.logger.log(ResultEvent::new(
                        "generation_rejected",
                        json!({
                            "temperature": request.temperature,
                            "attempts": attempts,
                            "reason": reason,
                        }),
                    ));
                    records.push(GenerationRecord {
                        temperature: request.temperature,
                        attempts,
                        rejection: Some(reason),
                    });
                }
            }
        }

        progress.on_phase_complete(&Phase::Generation);
        (parsed, records)
    }

    /// Re-request one slot until it parses or retries run out
    ///
    /// Returns the final outcome and the number of attempts made, the
    /// original request included.
    async fn retry_generation(
        &self,
        input: &RunConsensusInput,
        original: &GenerationRequest,
        first_reason: String,
        progress: &dyn ProgressNotifier,
    ) -> (Result<ParsedResponse, String>, usize) {
        let mut reason = first_reason;
        let mut request = original.clone();

        for retry in 1..=input.params.max_retries {
            warn!(
                "Generation at temperature {} rejected ({}), retry {}/{}",
                request.temperature, reason, retry, input.params.max_retries
            );
            progress.on_retry(request.temperature, retry, &reason);

            let system_prompt = retry_system_prompt(input.system_prompt.as_deref(), &reason, retry);
            request = request.retry(system_prompt);

            match validate_completion(self.gateway.generate(&request).await) {
                Ok(response) => return (Ok(response), retry + 1),
                Err(next) => reason = next,
            }
        }

        (Err(reason), input.params.max_retries + 1)
    }

    /// Phase 2: vote over the parsed responses (fallback ranking inside)
    fn phase_voting(
        &self,
        input: &RunConsensusInput,
        parsed: &[ParsedResponse],
        progress: &dyn ProgressNotifier,
    ) -> ConsensusResult {
        info!("Phase 2: Voting");
        progress.on_phase_start(&Phase::Voting, parsed.len());

        let consensus = count_parsed_votes(parsed, &input.params.rule);

        if consensus.is_terminal_failure() {
            warn!(
                "No usable candidate in {} parsed responses",
                consensus.total_responses
            );
        } else if consensus.had_consensus {
            self.logger.log(ResultEvent::new(
                "consensus_reached",
                json!({
                    "final_answer": consensus.final_answer,
                    "votes": consensus.votes_for_winner,
                    "total_responses": consensus.total_responses,
                    "confidence": consensus.confidence_percent,
                    "strength": consensus.consensus_strength.as_str(),
                    "fuzzy_matches": consensus.fuzzy_matches,
                }),
            ));
        } else {
            self.logger.log(ResultEvent::new(
                "fallback_used",
                json!({
                    "final_answer": consensus.final_answer,
                    "fallback_score": consensus.fallback_score,
                    "vote_confidence": consensus.vote_confidence_percent,
                    "confidence": consensus.confidence_percent,
                    "strength": consensus.consensus_strength.as_str(),
                }),
            ));
        }

        progress.on_phase_complete(&Phase::Voting);
        consensus
    }

    /// Phase 3: pick K candidates from the pooled tables
    fn phase_selection(
        &self,
        input: &RunConsensusInput,
        consensus: &ConsensusResult,
        parsed: &[ParsedResponse],
        progress: &dyn ProgressNotifier,
    ) -> Vec<Candidate> {
        info!("Phase 3: Selection");
        progress.on_phase_start(&Phase::Selection, 1);

        let pool = selection_pool(consensus, parsed);
        let selection = select_top_k(
            &pool,
            input.params.selection_size,
            input.params.tier,
            &input.request,
            consensus.consensus_strength,
        );

        self.logger.log(ResultEvent::new(
            "selection_completed",
            json!({
                "tier": input.params.tier.as_str(),
                "requested": input.params.selection_size,
                "pool_size": pool.len(),
                "selected": selection.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            }),
        ));

        progress.on_phase_complete(&Phase::Selection);
        selection
    }
}

/// Parse a completion, turning any failure into its reason string
fn validate_completion(result: Result<String, GatewayError>) -> Result<ParsedResponse, String> {
    let raw = result.map_err(|e| e.to_string())?;
    parse_response(&raw).map_err(|e| e.to_string())
}

/// System prompt for retry `attempt`, sterner on every attempt
fn retry_system_prompt(base: Option<&str>, reason: &str, attempt: usize) -> String {
    let warning = if attempt <= 1 {
        format!(
            "IMPORTANT: your previous answer was rejected ({reason}). Reply with the complete \
             markdown table (Rank, Name, Objective, Problems, How It Works, Tools, Metrics, \
             Feasibility) followed by a line of the form \"The answer is <Name>\"."
        )
    } else {
        format!(
            "CRITICAL: {attempt} answers in a row were rejected, the last one because of: \
             {reason}. Output ONLY the eight-column markdown table with its separator row, a \
             blank line, then exactly \"The answer is <Name>\". Nothing else."
        )
    };

    match base {
        Some(base) if !base.trim().is_empty() => format!("{base}\n\n{warning}"),
        _ => warning,
    }
}

/// Consensus table first; on the consensus path the other tables follow
fn selection_pool(consensus: &ConsensusResult, parsed: &[ParsedResponse]) -> Vec<Candidate> {
    let mut pool = consensus.all_candidates.clone();
    if !consensus.had_consensus {
        return pool;
    }

    let winner_table = parsed
        .iter()
        .position(|response| response.candidates == consensus.all_candidates);

    for (index, response) in parsed.iter().enumerate() {
        if Some(index) != winner_table {
            pool.extend(response.candidates.iter().cloned());
        }
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use consensus_domain::{ConsensusRule, ConsensusStrength, NO_CONSENSUS};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    const HEADER: &str =
        "| Rank | Name | Objective | Problems | How It Works | Tools | Metrics | Feasibility |";
    const SEPARATOR: &str = "|---|---|---|---|---|---|---|---|";

    fn table(rows: &[&str], answer: &str) -> String {
        let mut text = format!("{HEADER}\n{SEPARATOR}\n");
        for (i, name) in rows.iter().enumerate() {
            text.push_str(&format!(
                "| {} | {name} | Reduce manual work | Slow processing | Automates steps | Zapier | 40% reduction | High |\n",
                i + 1
            ));
        }
        text.push_str(&format!("\nThe answer is {answer}.\n"));
        text
    }

    fn invoice_table(answer: &str) -> String {
        table(&["Invoice Matcher", "Lead Scorer", "Email Triage"], answer)
    }

    /// Replays scripted completions per slot and records every request
    #[derive(Default)]
    struct ScriptedGateway {
        scripts: Mutex<HashMap<usize, VecDeque<Result<String, GatewayError>>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGateway {
        fn with_slot(self, slot: usize, replies: Vec<Result<String, GatewayError>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(slot, replies.into_iter().collect());
            self
        }

        fn uniform(slots: usize, reply: &str) -> Self {
            (0..slots).fold(Self::default(), |gateway, slot| {
                gateway.with_slot(slot, vec![Ok(reply.to_string())])
            })
        }

        fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&request.slot)
                .and_then(|replies| replies.pop_front())
                .unwrap_or(Err(GatewayError::NoRecordedResponse {
                    slot: request.slot,
                    attempt: request.attempt,
                }))
        }
    }

    #[derive(Default)]
    struct CapturingLogger {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl ResultLogger for CapturingLogger {
        fn log(&self, event: ResultEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    impl CapturingLogger {
        fn event_types(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }
    }

    #[tokio::test]
    async fn test_unanimous_run() {
        let gateway = Arc::new(ScriptedGateway::uniform(5, &invoice_table("Invoice Matcher")));
        let use_case = RunConsensusUseCase::new(gateway);

        let output = use_case
            .execute(RunConsensusInput::new("Automate invoices", ConsensusParams::default()))
            .await
            .unwrap();

        let consensus = output.consensus();
        assert!(consensus.had_consensus);
        assert_eq!(consensus.final_answer, "Invoice Matcher");
        assert_eq!(consensus.votes_for_winner, 5);
        assert_eq!(consensus.consensus_strength, ConsensusStrength::Strong);
        // Five identical tables collapse to three distinct names
        assert_eq!(output.selection().len(), 3);
        assert_eq!(output.rejected_count(), 0);
    }

    #[tokio::test]
    async fn test_retry_recovers_malformed_generation() {
        let good = invoice_table("Invoice Matcher");
        let gateway = Arc::new(
            ScriptedGateway::uniform(3, &good)
                .with_slot(1, vec![Ok("no table here".to_string()), Ok(good.clone())]),
        );
        let params = ConsensusParams::default().with_temperatures(vec![0.3, 0.6, 0.9]);
        let use_case = RunConsensusUseCase::new(Arc::clone(&gateway));

        let output = use_case
            .execute(RunConsensusInput::new("p", params).with_system_prompt("You are helpful."))
            .await
            .unwrap();

        assert_eq!(output.consensus().votes_for_winner, 3);
        assert_eq!(output.generations[1].attempts, 2);
        assert!(output.generations[1].is_accepted());

        let retry = gateway
            .requests()
            .into_iter()
            .find(|r| r.attempt == 1)
            .unwrap();
        assert_eq!(retry.slot, 1);
        assert_eq!(retry.temperature, 0.6);
        let system_prompt = retry.system_prompt.unwrap();
        assert!(system_prompt.starts_with("You are helpful."));
        assert!(system_prompt.contains("missing table header row"));
    }

    #[tokio::test]
    async fn test_exhausted_retries_exclude_generation() {
        let good = invoice_table("Invoice Matcher");
        let gateway = Arc::new(ScriptedGateway::uniform(4, &good).with_slot(
            4,
            vec![
                Err(GatewayError::Timeout),
                Ok("still nothing".to_string()),
                Ok("nope".to_string()),
            ],
        ));
        let logger = Arc::new(CapturingLogger::default());
        let use_case =
            RunConsensusUseCase::new(gateway).with_logger(Arc::clone(&logger) as Arc<dyn ResultLogger>);

        let output = use_case
            .execute(RunConsensusInput::new("p", ConsensusParams::default()))
            .await
            .unwrap();

        assert_eq!(output.consensus().total_responses, 4);
        assert_eq!(output.rejected_count(), 1);
        assert_eq!(output.generations[4].attempts, 3);
        assert_eq!(
            output.generations[4].rejection.as_deref(),
            Some("missing table header row")
        );
        assert_eq!(
            logger.event_types(),
            vec!["generation_rejected", "consensus_reached", "selection_completed"]
        );
    }

    #[tokio::test]
    async fn test_escalating_retry_prompts() {
        let gateway = Arc::new(ScriptedGateway::default());
        let params = ConsensusParams::default().with_temperatures(vec![0.5]);
        let use_case = RunConsensusUseCase::new(Arc::clone(&gateway));

        let result = use_case.execute(RunConsensusInput::new("p", params)).await;
        assert!(matches!(result, Err(RunConsensusError::AllGenerationsFailed(1))));

        let prompts: Vec<String> = gateway
            .requests()
            .into_iter()
            .filter_map(|r| r.system_prompt)
            .collect();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].starts_with("IMPORTANT"));
        assert!(prompts[1].starts_with("CRITICAL"));
    }

    #[tokio::test]
    async fn test_fallback_run() {
        let gateway = Arc::new(
            ScriptedGateway::default()
                .with_slot(0, vec![Ok(invoice_table("Invoice Matcher"))])
                .with_slot(1, vec![Ok(invoice_table("Lead Scorer"))])
                .with_slot(2, vec![Ok(invoice_table("Email Triage"))]),
        );
        let params = ConsensusParams::default()
            .with_temperatures(vec![0.3, 0.6, 0.9])
            .with_rule(ConsensusRule::new(2));
        let logger = Arc::new(CapturingLogger::default());
        let use_case =
            RunConsensusUseCase::new(gateway).with_logger(Arc::clone(&logger) as Arc<dyn ResultLogger>);

        let output = use_case
            .execute(RunConsensusInput::new("Automate invoices", params))
            .await
            .unwrap();

        assert!(!output.consensus().had_consensus);
        assert!(output.consensus().used_fallback());
        assert!(output.consensus().fallback_score.is_some());
        assert!(logger.event_types().contains(&"fallback_used"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_distinct_failure() {
        // Answers disagree and no row has enough cells
        let broken = |answer: &str| {
            format!("{HEADER}\n{SEPARATOR}\n| 1 | Short |\n\nThe answer is {answer}.")
        };
        let gateway = Arc::new(
            ScriptedGateway::default()
                .with_slot(0, vec![Ok(broken("Alpha"))])
                .with_slot(1, vec![Ok(broken("Beta"))]),
        );
        let params = ConsensusParams::default().with_temperatures(vec![0.3, 0.9]);
        let use_case = RunConsensusUseCase::new(gateway);

        let result = use_case.execute(RunConsensusInput::new("p", params)).await;
        let err = result.unwrap_err();
        assert!(matches!(err, RunConsensusError::NoCandidates(2)));
        assert!(err.to_string().starts_with(NO_CONSENSUS));
    }

    #[tokio::test]
    async fn test_agreed_answer_without_rows_is_no_candidates() {
        let short_rows = format!(
            "{HEADER}\n{SEPARATOR}\n| 1 | Lead Scorer | only |\n\nThe answer is Lead Scorer."
        );
        let gateway = Arc::new(ScriptedGateway::uniform(5, &short_rows));
        let logger = Arc::new(CapturingLogger::default());
        let use_case = RunConsensusUseCase::new(gateway)
            .with_logger(Arc::clone(&logger) as Arc<dyn ResultLogger>);

        let result = use_case
            .execute(RunConsensusInput::new("p", ConsensusParams::default()))
            .await;

        assert!(matches!(result, Err(RunConsensusError::NoCandidates(5))));
        assert!(!logger.event_types().contains(&"consensus_reached"));
        assert!(!logger.event_types().contains(&"selection_completed"));
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let gateway = Arc::new(ScriptedGateway::default());
        let params = ConsensusParams::default().with_temperatures(vec![]);
        let use_case = RunConsensusUseCase::new(Arc::clone(&gateway));

        let result = use_case.execute(RunConsensusInput::new("p", params)).await;
        assert!(matches!(
            result,
            Err(RunConsensusError::InvalidParams(DomainError::NoTemperatures))
        ));
        assert!(gateway.requests().is_empty());
    }

    #[test]
    fn test_selection_pool_on_consensus_path() {
        let winner = ParsedResponse::new("A", vec![Candidate::new("A"), Candidate::new("B")]);
        let other = ParsedResponse::new("A", vec![Candidate::new("C")]);
        let parsed = vec![other.clone(), winner.clone()];

        let consensus = ConsensusResult {
            had_consensus: true,
            all_candidates: winner.candidates.clone(),
            ..ConsensusResult::no_consensus()
        };

        let names: Vec<String> = selection_pool(&consensus, &parsed)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_retry_system_prompt_without_base() {
        let prompt = retry_system_prompt(None, "missing declared answer", 1);
        assert!(prompt.starts_with("IMPORTANT"));
        assert!(prompt.contains("missing declared answer"));
    }
}
