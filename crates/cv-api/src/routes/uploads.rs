//! Certificate upload routes

use crate::error::ApiError;
use crate::models::FileRecord;
use crate::session::AuthedUser;
use crate::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use cv_core::now_iso;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Accepts multipart `files` fields and stores one metadata record per
/// accepted file. Rejected files produce `{fileName, error}` entries
/// instead of failing the batch.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    user: AuthedUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut results = Vec::new();
    let mut last_ts = 0i64;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let content_type = match field.content_type() {
            Some(ct) => ct.to_string(),
            None => mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let file_size = bytes.len() as u64;

        if let Err(rejection) = state.validator.policy().check(&content_type, file_size) {
            results.push(json!({ "fileName": file_name, "error": rejection.to_string() }));
            continue;
        }

        // Millisecond keys; bump on collision within the batch
        let mut ts = Utc::now().timestamp_millis();
        if ts <= last_ts {
            ts = last_ts + 1;
        }
        last_ts = ts;

        let file_id = format!("file:{}:{}", user.id, ts);
        let uploaded_at = now_iso();
        let record = FileRecord {
            id: file_id.clone(),
            user_id: user.id.clone(),
            file_name: file_name.clone(),
            original_name: file_name.clone(),
            file_size,
            file_type: content_type,
            uploaded_at: uploaded_at.clone(),
            status: "uploaded".to_string(),
            validation_id: None,
            validated_at: None,
        };

        match state.store.set(&file_id, &record) {
            Ok(()) => results.push(json!({
                "fileName": file_name,
                "fileId": file_id,
                "fileSize": file_size,
                "uploadedAt": uploaded_at,
                "success": true,
            })),
            Err(err) => {
                error!("Upload error for {}: {}", file_name, err);
                results.push(json!({ "fileName": file_name, "error": "Upload failed" }));
            }
        }
    }

    if results.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    info!("Upload completed for {}: {} file(s)", user.id, results.len());
    Ok(Json(json!({ "message": "Upload completed", "results": results })))
}
