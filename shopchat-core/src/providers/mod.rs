//! Completion provider implementations.
//!
//! Use `create_provider()` to build the client handle the chat service
//! is given at start-up.

pub mod openai_compat;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use std::sync::Arc;

pub use openai_compat::OpenAiCompatibleProvider;

/// Create the completion client for an already-resolved API key.
///
/// Returns `None` when no key is available: the chat service then answers
/// with the missing-key notice instead of calling out.
pub fn create_provider(config: &LlmConfig, api_key: Option<String>) -> Option<Arc<dyn LlmProvider>> {
    let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
        tracing::warn!(
            env = %config.api_key_env,
            "No API key configured; chat replies will carry the missing-key notice"
        );
        return None;
    };
    tracing::info!(model = %config.model, "Completion provider ready");
    Some(Arc::new(OpenAiCompatibleProvider::new(config, api_key)))
}
