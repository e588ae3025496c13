//! HTTP surface of the FlashAgent browser service.
//!
//! Deliberately small: a liveness probe, so deployment tooling and the MCP
//! side can tell the process is up. Task execution stays a library concern
//! (`flashagent-agent`); embedders mount their own routes next to this one.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Build the service router.
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
