//! Chat orchestration: catalog lookup, prompt assembly, completion call,
//! and history update for a single user message.

use crate::brain::LlmProvider;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::error::Result;
use crate::history::ChatHistory;
use crate::prompt::build_prompt;
use crate::types::CompletionRequest;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Reply substituted when no API key is configured.
pub const MISSING_API_KEY_NOTICE: &str = "OpenAI API key is missing. Set the OPENAI_API_KEY environment variable to enable the chatbot.";

/// What happened to a submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Blank input; history left untouched.
    Ignored,
    /// A reply was produced and appended to the history.
    Replied { reply: String },
}

/// Answers user messages against the product catalog.
#[derive(Clone)]
pub struct ChatService {
    provider: Option<Arc<dyn LlmProvider>>,
    catalog_path: PathBuf,
    match_limit: usize,
    temperature: f32,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("llm_enabled", &self.llm_enabled())
            .field("catalog_path", &self.catalog_path)
            .field("match_limit", &self.match_limit)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ChatService {
    /// Create a service. `provider` is `None` when no API key is configured.
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            catalog_path: catalog_path.into(),
            match_limit: crate::catalog::DEFAULT_MATCH_LIMIT,
            temperature: 0.4,
        }
    }

    /// Create a service from loaded configuration.
    pub fn from_config(
        config: &AppConfig,
        workspace: &Path,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self::new(provider, config.catalog.resolve_path(workspace))
            .with_match_limit(config.catalog.match_limit)
            .with_temperature(config.llm.temperature)
    }

    /// Set the maximum rows per prompt. At least one row is always kept.
    pub fn with_match_limit(mut self, limit: usize) -> Self {
        self.match_limit = limit.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whether replies come from the completion API.
    pub fn llm_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Model name of the configured provider, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model_name())
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Produce a reply for one message without touching any history.
    ///
    /// The catalog is reloaded on every call; a missing catalog file or a
    /// failed completion call is returned as an error.
    pub async fn reply(&self, message: &str) -> Result<String> {
        let catalog = Catalog::load(&self.catalog_path).await?;
        let rows = catalog.find_relevant_rows(message, self.match_limit);
        debug!(matched = rows.len(), catalog_rows = catalog.len(), "Selected catalog rows");

        let messages = build_prompt(&rows, message);

        let Some(provider) = &self.provider else {
            info!("No API key configured; answering with notice");
            return Ok(MISSING_API_KEY_NOTICE.to_string());
        };

        let response = provider
            .complete(CompletionRequest {
                messages,
                temperature: self.temperature,
                ..Default::default()
            })
            .await?;

        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );
        Ok(response.message.content)
    }

    /// Handle a submitted message: reply to it and append the turn.
    ///
    /// Blank input is ignored. On error the history is left unchanged.
    pub async fn handle_message(
        &self,
        history: &mut ChatHistory,
        message: &str,
    ) -> Result<ChatOutcome> {
        let message = message.trim();
        if message.is_empty() {
            debug!("Ignoring empty chat message");
            return Ok(ChatOutcome::Ignored);
        }

        let reply = self.reply(message).await?;
        history.push(message, reply.clone());
        Ok(ChatOutcome::Replied { reply })
    }
}
