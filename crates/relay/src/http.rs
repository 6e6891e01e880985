//! HTTP surface of the relay.
//!
//! - `POST /action`: one JSON [`Action`], answered with a JSON [`Reply`]
//! - `GET /messages/:player_id`: drain the player's queue
//! - `GET /health`: liveness and room count

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use game_core::{Action, PlayerId, Push, Reply};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::RelayError;
use crate::store::RoomStore;

pub fn router(store: Arc<RoomStore>) -> Router {
    Router::new()
        .route("/action", post(action))
        .route("/messages/:player_id", get(messages))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn action(
    State(store): State<Arc<RoomStore>>,
    body: Result<Json<Action>, JsonRejection>,
) -> Result<Json<Reply>, RelayError> {
    let Json(action) = body.map_err(|e| RelayError::Invalid(e.body_text()))?;
    debug!(action = action.name(), "action received");
    store.handle(action).await.map(Json)
}

async fn messages(
    State(store): State<Arc<RoomStore>>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<Push>>, RelayError> {
    store
        .poll_messages(&PlayerId::new(player_id))
        .await
        .map(Json)
}

async fn health(State(store): State<Arc<RoomStore>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "rooms": store.room_count().await,
    }))
}
