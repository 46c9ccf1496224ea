//! API routes

pub mod artifacts;
pub mod auth;
pub mod uploads;
pub mod validations;
pub mod verify;

use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
