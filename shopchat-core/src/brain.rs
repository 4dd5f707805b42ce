//! Brain module — completion provider abstraction.
//!
//! Defines the `LlmProvider` trait the chat service talks to, plus a
//! `MockLlmProvider` for tests and offline runs.

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, Message, TokenUsage};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Trait for completion providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// A provider that answers from a canned script instead of the network.
pub struct MockLlmProvider {
    model: String,
    responses: Mutex<Vec<CompletionResponse>>,
    fallback: Option<String>,
    error: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Mutex::new(Vec::new()),
            fallback: None,
            error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a MockLlmProvider that always returns the given text.
    pub fn with_response(text: &str) -> Self {
        Self {
            fallback: Some(text.to_string()),
            ..Self::new()
        }
    }

    /// Create a MockLlmProvider whose every call fails with an API error.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Queue a response to be returned by the next `complete` call.
    pub fn queue_response(&self, response: CompletionResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(response);
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `complete` calls received.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if let Some(message) = &self.error {
            return Err(LlmError::ApiRequest {
                message: message.clone(),
            });
        }

        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        if !responses.is_empty() {
            return Ok(responses.remove(0));
        }
        let text = self
            .fallback
            .as_deref()
            .unwrap_or("I'm a mock LLM. No queued responses available.");
        Ok(Self::text_response(text))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
