//! QR payload verification route

use crate::error::ApiJson;
use axum::Json;
use cv_artifacts::{validate_qr_data, QrCheck};
use serde_json::Value;

/// Structural check of a scanned QR payload. Unauthenticated: anyone
/// holding a certificate can verify it.
pub async fn verify_qr(ApiJson(payload): ApiJson<Value>) -> Json<QrCheck> {
    Json(validate_qr_data(&payload))
}
