use crate::llm::Provider;
use serde_json::Value;
use thiserror::Error;

/// Upstream failure with enough context to debug what the provider sent back.
#[derive(Debug, Clone, Error)]
#[error("LLM error (provider={provider:?}, stage={stage}): {detail}")]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

/// Why no structured payload could be taken from a completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no JSON {expected} found in completion text")]
    NotFound { expected: &'static str },

    #[error("found {candidates} JSON {expected} candidate(s) but none parsed: {last_error}")]
    Parse {
        expected: &'static str,
        candidates: usize,
        last_error: String,
    },
}
