//! # Shopchat Core
//!
//! Core library for the shopchat catalog-grounded chatbot.
//! Provides the CSV catalog matcher, prompt assembly, the completion
//! provider interface (brain), chat orchestration, configuration, and the
//! axum web gateway.

pub mod brain;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod prompt;
pub mod providers;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{LlmProvider, MockLlmProvider};
pub use catalog::{Catalog, CatalogRow};
pub use chat::{ChatOutcome, ChatService, MISSING_API_KEY_NOTICE};
pub use config::{AppConfig, load_config};
pub use error::{Result, ShopChatError};
pub use gateway::{AppState, SharedState};
pub use history::{ChatHistory, ChatTurn};
pub use prompt::build_prompt;
pub use providers::create_provider;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};
