//! Upload acceptance policy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted document in bytes.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Why an uploaded document was turned away. Rejections surface as
/// per-file entries, never as a whole-request failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("File type {0} is not supported")]
    UnsupportedType(String),

    #[error("File size exceeds {0}MB limit")]
    TooLarge(u64),
}

/// Acceptance policy applied to every uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Largest accepted document in bytes.
    pub max_file_size: u64,
    /// Accepted MIME types.
    pub accepted_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            accepted_types: default_accepted_types(),
        }
    }
}

impl UploadPolicy {
    /// Check one document against the policy. Type is checked before size.
    pub fn check(&self, content_type: &str, file_size: u64) -> Result<(), UploadRejection> {
        if !self.accepts_type(content_type) {
            return Err(UploadRejection::UnsupportedType(content_type.to_string()));
        }
        if file_size > self.max_file_size {
            return Err(UploadRejection::TooLarge(self.max_file_size / (1024 * 1024)));
        }
        Ok(())
    }

    /// Whether a MIME type is accepted. Parameters after `;` are ignored.
    pub fn accepts_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        self.accepted_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(essence))
    }
}

/// MIME types accepted out of the box: PDF, Word documents, JPEG, PNG
/// and plain text.
pub fn default_accepted_types() -> Vec<String> {
    [
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "image/jpeg",
        "image/png",
        "text/plain",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
