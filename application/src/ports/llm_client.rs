//! LLM client port
//!
//! Defines the interface for communicating with a language-model backend.
//! One call is one request/response pair; the core performs no retries.

use async_trait::async_trait;
use scholar_domain::Message;
use thiserror::Error;

/// Errors that can occur during a model call.
///
/// Callers treat every variant the same way — "the call failed" — and
/// degrade per their stage's fallback; the variants exist for logs.
#[derive(Error, Debug)]
pub enum ModelCallError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider rejected the request: {0}")]
    Provider(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out")]
    Timeout,
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions {
    /// Ask the provider for strictly parseable JSON output. Best-effort:
    /// callers must still validate what comes back.
    pub json_output: bool,
}

impl CompletionOptions {
    pub fn json() -> Self {
        Self { json_output: true }
    }
}

/// Stateless capability for completing a message sequence.
///
/// Implementations hold the endpoint and credentials; the model id is
/// passed per call so agents with different bindings can share one
/// client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, ModelCallError>;
}
