//! REST API layer
//!
//! Thin axum surface over the chatbot: one GET endpoint for quick queries,
//! one POST endpoint carrying mode and caller-owned AI history, plus a
//! health check. Every turn is logged fire-and-forget.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::bot::Chatbot;
use crate::models::{ChatTurn, Mode};
use crate::storage::ChatLog;

/// AI mode keeps at most this many prior turns per request.
const HISTORY_LIMIT: usize = 10;

#[derive(Clone)]
pub struct ApiState {
    pub bot: Arc<Chatbot>,
    pub chat_log: Arc<ChatLog>,
}

#[derive(Debug, Deserialize)]
pub struct GetParams {
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "FinTalkBot API"
    }))
}

/// GET /get?msg=… — rule-based reply for one utterance.
async fn get_bot_response(
    State(state): State<ApiState>,
    Query(params): Query<GetParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(msg) = params.msg.filter(|m| !m.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "No message provided",
                "message": "Please provide a 'msg' parameter"
            })),
        );
    };

    info!("Received GET query: {}", msg);
    let reply = state.bot.respond(Some(msg.trim())).await;

    log_turn(&state, msg.trim(), &reply, None).await;

    (
        StatusCode::OK,
        Json(json!({
            "response": reply,
            "status": "success"
        })),
    )
}

/// POST /chat — rule-based or AI-delegated reply.
async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(message) = req.message.filter(|m| !m.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "No message provided",
                "message": "Please provide a 'message' field in your request"
            })),
        );
    };

    let mode = req.mode.unwrap_or_default();
    info!(?mode, "Received chat message: {}", message);

    // History is caller-owned; keep only the most recent turns
    let history_start = req.history.len().saturating_sub(HISTORY_LIMIT);
    let history = &req.history[history_start..];

    let trimmed = message.trim();
    let reply = state
        .bot
        .respond_with_mode(Some(trimmed), mode, history)
        .await;

    let mode_label = match mode {
        Mode::Ai => Some("ai"),
        Mode::Rules => None,
    };
    log_turn(&state, trimmed, &reply, mode_label).await;

    (
        StatusCode::OK,
        Json(json!({
            "reply": reply,
            "status": "success",
            "user_input": message
        })),
    )
}

/// Fire-and-forget: a failed log write never affects the computed reply.
async fn log_turn(state: &ApiState, user_text: &str, reply: &str, mode: Option<&str>) {
    if let Err(e) = state.chat_log.log_chat(user_text, reply, mode).await {
        warn!("Chat log write failed: {}", e);
    }
}

pub fn create_router(bot: Arc<Chatbot>, chat_log: Arc<ChatLog>) -> Router {
    let state = ApiState { bot, chat_log };

    Router::new()
        .route("/health", get(health))
        .route("/get", get(get_bot_response))
        .route("/chat", post(chat))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(
    bot: Arc<Chatbot>,
    chat_log: Arc<ChatLog>,
    host: &str,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(bot, chat_log);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    info!("FinTalkBot API listening on http://{}:{}", host, port);

    axum::serve(listener, router).await?;

    Ok(())
}
