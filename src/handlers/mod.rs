// src/handlers/mod.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

pub mod auth;
pub mod quiz;
pub mod result;

/// Liveness probe for load balancers.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "message": "Quiz backend is running" }))
}
