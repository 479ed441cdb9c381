//! HTTP route handlers for the concierge API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use crate::analytics::report::{AnalyticsSummary, export_csv, summarize};
use crate::analytics::store::load_or_empty;
use crate::catalog::MenuItem;
use crate::chat::context::ConversationContext;
use crate::chat::errors::ChatError;
use crate::chat::message::ChatMessage;

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/menu", get(menu))
        .route("/api/session", post(open_session))
        .route("/api/session/{id}", delete(close_session))
        .route("/api/chat", post(chat_turn))
        .route("/api/track/order-click", post(order_click))
        .route("/api/feedback", post(feedback))
        .route("/api/analytics/summary", get(analytics_summary))
        .route("/api/analytics/export", get(analytics_export))
        .fallback_service(ServeDir::new("static"))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "hbrothers-concierge",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Full menu catalog.
async fn menu(State(state): State<Arc<AppState>>) -> Json<Vec<MenuItem>> {
    Json(state.service.catalog().items().to_vec())
}

/// Response for a newly opened chat window.
#[derive(Debug, Serialize)]
pub struct SessionOpened {
    /// Identifier for subsequent calls.
    pub session_id: String,
    /// Greeting message with welcome suggestions.
    pub greeting: ChatMessage,
}

/// Open a chat window.
async fn open_session(State(state): State<Arc<AppState>>) -> Json<SessionOpened> {
    let (id, handle) = state.open_session();
    let greeting = {
        let session = handle.lock().await;
        session.messages().first().cloned()
    };
    Json(SessionOpened {
        session_id: id.to_string(),
        greeting: greeting.unwrap_or_else(|| state.service.greeting()),
    })
}

/// One chat turn request.
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    /// Chat window identifier from `POST /api/session`.
    pub session_id: String,
    /// The customer's message.
    pub message: String,
    /// True when the message came from tapping a suggested-reply chip.
    #[serde(default)]
    pub quick_reply: bool,
}

/// One chat turn response.
#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    /// The concierge reply with detected items and suggestions.
    pub message: ChatMessage,
    /// Updated conversation context.
    pub context: ConversationContext,
}

/// Handle one chat turn.
async fn chat_turn(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatTurnRequest>,
) -> Result<Json<ChatTurnResponse>, (StatusCode, String)> {
    let handle = state
        .session(&request.session_id)
        .ok_or((StatusCode::NOT_FOUND, "unknown chat session".to_string()))?;

    // One in-flight turn per window: the session mutex serializes callers.
    let mut session = handle.lock().await;
    if request.quick_reply {
        session.track_quick_action(&request.message);
    }

    let message = match session.send(&state.service, &request.message).await {
        Ok(message) => message.clone(),
        Err(ChatError::EmptyMessage) => {
            return Err((StatusCode::BAD_REQUEST, "message is empty".to_string()));
        }
        Err(err) => {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Chat error: {err}")));
        }
    };

    Ok(Json(ChatTurnResponse {
        message,
        context: session.context().clone(),
    }))
}

/// Order-click tracking request.
#[derive(Debug, Deserialize)]
pub struct OrderClickRequest {
    /// Chat window identifier.
    pub session_id: String,
}

/// Order-click tracking response.
#[derive(Debug, Serialize)]
pub struct OrderClickResponse {
    /// The external ordering site to open.
    pub order_url: String,
}

/// Record a click on the external order link.
async fn order_click(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderClickRequest>,
) -> Result<Json<OrderClickResponse>, (StatusCode, String)> {
    let handle = state
        .session(&request.session_id)
        .ok_or((StatusCode::NOT_FOUND, "unknown chat session".to_string()))?;
    handle.lock().await.track_order_click();

    Ok(Json(OrderClickResponse {
        order_url: state.service.config().restaurant.order_url.clone(),
    }))
}

/// Feedback request.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Chat window identifier.
    pub session_id: String,
    /// Rating score.
    pub rating: u8,
    /// Optional free-form comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Record feedback for the window's current analytics session.
async fn feedback(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let handle = state
        .session(&request.session_id)
        .ok_or((StatusCode::NOT_FOUND, "unknown chat session".to_string()))?;
    handle
        .lock()
        .await
        .track_feedback(request.rating, request.comment);

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// Close a chat window: persist its analytics session and drop its state.
async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let handle = state
        .remove_session(&id)
        .ok_or((StatusCode::NOT_FOUND, "unknown chat session".to_string()))?;
    handle.lock().await.close().await;

    Ok(Json(serde_json::json!({ "status": "closed" })))
}

/// Owner summary over the persisted history.
async fn analytics_summary(State(state): State<Arc<AppState>>) -> Json<AnalyticsSummary> {
    let history = load_or_empty(state.store.as_ref()).await;
    Json(summarize(&history))
}

/// CSV export of the persisted history.
async fn analytics_export(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let history = load_or_empty(state.store.as_ref()).await;
    (
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        export_csv(&history),
    )
}
