//! Validation routes

use crate::error::{ApiError, ApiJson};
use crate::models::{FileRecord, ValidationRecord};
use crate::session::AuthedUser;
use crate::store::StoreError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use cv_core::now_iso;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// History responses are capped at the newest records.
pub const HISTORY_LIMIT: usize = 50;

/// Scores each file in `fileIds` sequentially. Unknown or foreign ids
/// produce `{fileId, error}` entries; the batch never aborts.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    user: AuthedUser,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<Value>, ApiError> {
    let Some(file_ids) = body.get("fileIds").and_then(Value::as_array) else {
        return Err(ApiError::bad_request("File IDs array required"));
    };

    let mut results = Vec::new();
    let mut last_ts = 0i64;

    for raw_id in file_ids {
        let file = match raw_id.as_str() {
            Some(id) => match state.store.get::<FileRecord>(id) {
                Ok(found) => found.filter(|f| f.user_id == user.id),
                Err(err) => {
                    error!("Validation error for {}: {}", id, err);
                    results.push(json!({ "fileId": raw_id, "error": "Validation failed" }));
                    continue;
                }
            },
            None => None,
        };

        let Some(file) = file else {
            results.push(json!({ "fileId": raw_id, "error": "File not found or access denied" }));
            continue;
        };

        match score_file(&state, &user, &file, &mut last_ts) {
            Ok(record) => results.push(serde_json::to_value(&record)?),
            Err(err) => {
                error!("Validation error for {}: {}", file.id, err);
                results.push(json!({ "fileId": file.id, "error": "Validation failed" }));
            }
        }
    }

    info!(
        "Validation completed for {}: {} result(s)",
        user.id,
        results.len()
    );
    Ok(Json(json!({ "message": "Validation completed", "results": results })))
}

/// Runs the scorer, stores the record and marks the file validated.
fn score_file(
    state: &AppState,
    user: &AuthedUser,
    file: &FileRecord,
    last_ts: &mut i64,
) -> Result<ValidationRecord, StoreError> {
    let result = state.validator.validate(&file.file_name, file.file_size);

    let mut ts = Utc::now().timestamp_millis();
    if ts <= *last_ts {
        ts = *last_ts + 1;
    }
    *last_ts = ts;

    let validated_at = now_iso();
    let record = ValidationRecord {
        id: format!("validation:{}:{}", user.id, ts),
        file_id: file.id.clone(),
        user_id: user.id.clone(),
        validated_at: validated_at.clone(),
        result,
    };
    state.store.set(&record.id, &record)?;

    let mut updated = file.clone();
    updated.status = "validated".to_string();
    updated.validation_id = Some(record.id.clone());
    updated.validated_at = Some(validated_at);
    state.store.set(&file.id, &updated)?;

    Ok(record)
}

/// The caller's validation history, newest first, capped at
/// [`HISTORY_LIMIT`].
pub async fn list_validations(
    State(state): State<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<Value>, ApiError> {
    let validations = load_history(&state, &user)?;
    Ok(Json(json!({ "validations": validations })))
}

/// Dashboard aggregates over the caller's history window.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<Value>, ApiError> {
    let validations = load_history(&state, &user)?;

    let total = validations.len();
    let authentic = validations
        .iter()
        .filter(|v| v.result.authenticity.as_str() == "authentic")
        .count();
    let flagged = validations
        .iter()
        .filter(|v| !v.result.issues.is_empty())
        .count();

    let authentic_rate = if total > 0 {
        authentic as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let avg_processing_time = if total > 0 {
        validations
            .iter()
            .map(|v| v.result.processing_time as f64)
            .sum::<f64>()
            / total as f64
    } else {
        0.0
    };

    Ok(Json(json!({
        "totalValidations": total,
        "authenticRate": authentic_rate,
        "flaggedDocuments": flagged,
        "avgProcessingTime": avg_processing_time,
    })))
}

fn load_history(state: &AppState, user: &AuthedUser) -> Result<Vec<ValidationRecord>, StoreError> {
    let mut validations = state
        .store
        .get_by_prefix::<ValidationRecord>(&format!("validation:{}:", user.id))?;

    validations.sort_by_key(|v| {
        std::cmp::Reverse(
            DateTime::parse_from_rfc3339(&v.validated_at)
                .map(|t| t.timestamp_millis())
                .unwrap_or(0),
        )
    });
    validations.truncate(HISTORY_LIMIT);
    Ok(validations)
}
