//! LLM Gateway port
//!
//! Defines the interface for requesting completions from an LLM provider.

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("No recorded response for slot {slot} (attempt {attempt})")]
    NoRecordedResponse { slot: usize, attempt: usize },

    #[error("Timeout")]
    Timeout,
}

/// One completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub temperature: f64,
    /// Position of this temperature in the sampling plan
    pub slot: usize,
    /// 0 for the first attempt, incremented on every retry
    pub attempt: usize,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            temperature,
            slot: 0,
            attempt: 0,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = slot;
        self
    }

    /// Same slot and temperature, next attempt, with a replacement system prompt
    pub fn retry(&self, system_prompt: String) -> Self {
        Self {
            system_prompt: Some(system_prompt),
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }
}

/// Gateway for LLM completions
///
/// This port defines how the application layer talks to LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Request a single completion
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;

    /// Request every completion concurrently
    ///
    /// Results come back in request order regardless of completion order,
    /// and one failure never aborts the others.
    async fn generate_parallel(
        &self,
        requests: &[GenerationRequest],
    ) -> Vec<Result<String, GatewayError>> {
        join_all(requests.iter().map(|request| self.generate(request))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGateway;

    #[async_trait]
    impl LlmGateway for EchoGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            if request.temperature > 1.0 {
                return Err(GatewayError::Timeout);
            }
            Ok(format!("{}@{}", request.prompt, request.temperature))
        }
    }

    #[tokio::test]
    async fn test_generate_parallel_keeps_order() {
        let requests: Vec<_> = [0.3, 1.5, 0.9]
            .iter()
            .enumerate()
            .map(|(slot, t)| GenerationRequest::new("p", *t).with_slot(slot))
            .collect();

        let results = EchoGateway.generate_parallel(&requests).await;
        assert_eq!(results[0], Ok("p@0.3".to_string()));
        assert_eq!(results[1], Err(GatewayError::Timeout));
        assert_eq!(results[2], Ok("p@0.9".to_string()));
    }

    #[test]
    fn test_retry_request() {
        let request = GenerationRequest::new("p", 0.7).with_slot(2);
        let retry = request.retry("be careful".to_string());
        assert_eq!(retry.slot, 2);
        assert_eq!(retry.attempt, 1);
        assert_eq!(retry.temperature, 0.7);
        assert_eq!(retry.system_prompt.as_deref(), Some("be careful"));
    }

    #[test]
    fn test_gateway_error_reasons() {
        // These strings end up in retry prompts and rejection records
        let missing = GatewayError::NoRecordedResponse { slot: 1, attempt: 2 };
        assert_eq!(
            missing.to_string(),
            "No recorded response for slot 1 (attempt 2)"
        );
        assert_eq!(GatewayError::Timeout.to_string(), "Timeout");
    }
}
