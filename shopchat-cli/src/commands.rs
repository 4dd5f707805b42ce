//! CLI subcommand handlers.

use shopchat_core::gateway::{AppState, run_gateway};
use shopchat_core::{AppConfig, ChatHistory, ChatOutcome, ChatService, create_provider};
use std::path::Path;

fn build_service(config: &AppConfig, workspace: &Path) -> ChatService {
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }
    let provider = create_provider(&config.llm, config.llm.resolve_api_key());
    ChatService::from_config(config, workspace, provider)
}

/// Start the web server.
pub async fn serve(config: &AppConfig, workspace: &Path) -> anyhow::Result<()> {
    let chat = build_service(config, workspace);
    tracing::info!(
        catalog = %chat.catalog_path().display(),
        llm_enabled = chat.llm_enabled(),
        "Starting shopchat"
    );
    if !chat.catalog_path().exists() {
        tracing::warn!(
            path = %chat.catalog_path().display(),
            "Catalog file not found; chat requests will fail until it exists"
        );
    }

    let state = AppState::from_config(config, chat).into_shared();
    run_gateway(state, &config.server.bind_addr())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

/// Answer one question in the terminal.
pub async fn ask(config: &AppConfig, workspace: &Path, question: &str) -> anyhow::Result<()> {
    let chat = build_service(config, workspace);
    let mut history = ChatHistory::new();
    match chat.handle_message(&mut history, question).await? {
        ChatOutcome::Replied { reply } => println!("{reply}"),
        ChatOutcome::Ignored => eprintln!("Nothing to ask."),
    }
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn show_config(config: &AppConfig) -> anyhow::Result<()> {
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("{toml_str}");
    Ok(())
}
