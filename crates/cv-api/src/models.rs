//! Stored record types

use cv_core::ValidationResult;
use serde::{Deserialize, Serialize};

/// A registered account. Stored at `user:{id}`, with the id indexed at
/// `user_email:{email}` for signin lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub institution: String,
    pub role: String,
    pub department: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Metadata for an uploaded document. Stored at `file:{user}:{millis}`;
/// the key doubles as the public file id. Content is not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub original_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub uploaded_at: String,
    /// `uploaded`, then `validated` once scored.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<String>,
}

/// A completed validation. Stored at `validation:{user}:{millis}` and
/// returned verbatim from the validate and history routes, with the
/// scoring result flattened into the top-level object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    pub id: String,
    pub file_id: String,
    pub user_id: String,
    pub validated_at: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}
