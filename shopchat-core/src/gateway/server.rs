//! HTTP gateway server built on axum.

use super::page::PageRenderer;
use super::session::SessionCodec;
use crate::chat::{ChatOutcome, ChatService};
use crate::config::AppConfig;
use crate::error::ShopChatError;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Thread-safe shared state reference for axum handlers.
pub type SharedState = Arc<AppState>;

/// Immutable state shared by all requests.
pub struct AppState {
    chat: ChatService,
    sessions: SessionCodec,
    pages: PageRenderer,
    started_at: chrono::DateTime<Utc>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("chat", &self.chat)
            .field("sessions", &self.sessions)
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl AppState {
    pub fn new(chat: ChatService, sessions: SessionCodec) -> Self {
        Self {
            chat,
            sessions,
            pages: PageRenderer::new(),
            started_at: Utc::now(),
        }
    }

    /// Build state from configuration.
    pub fn from_config(config: &AppConfig, chat: ChatService) -> Self {
        let sessions = SessionCodec::new(&config.server.secret_key, config.server.cookie_name.clone());
        Self::new(chat, sessions)
    }

    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(self)
    }
}

/// A request-level failure, answered with HTTP 500.
#[derive(Debug)]
pub struct GatewayError(ShopChatError);

impl<E: Into<ShopChatError>> From<E> for GatewayError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    message: String,
}

/// Build the axum router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Html<String>, GatewayError> {
    let history = state.sessions.load(&headers);
    let html = state.pages.render_index(&history, state.chat.llm_enabled())?;
    Ok(Html(html))
}

async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Result<Response, GatewayError> {
    let mut history = state.sessions.load(&headers);

    match state.chat.handle_message(&mut history, &form.message).await? {
        ChatOutcome::Ignored => Ok(Redirect::to("/").into_response()),
        ChatOutcome::Replied { .. } => {
            let cookie = state.sessions.set_cookie(&history)?;
            Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
        }
    }
}

async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let uptime = Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();
    Json(serde_json::json!({
        "status": "ok",
        "model": state.chat.model_name(),
        "llm_enabled": state.chat.llm_enabled(),
        "uptime_secs": uptime,
    }))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn run(state: SharedState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
