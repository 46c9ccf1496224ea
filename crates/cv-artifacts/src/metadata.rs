//! Verification metadata
//!
//! The canonical record hashed into QR codes. Field order matters: the
//! verification hash is computed over the JSON serialization, so the
//! struct declaration order below is part of the wire contract.

use crate::error::ArtifactResult;
use cv_core::{now_iso, CertificateMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata format version embedded in QR payloads and verification files.
pub const METADATA_VERSION: &str = "1.0";

/// A validated certificate as the artifact pipeline consumes it. Built
/// from a stored validation record or parsed from caller-supplied JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateData {
    pub file_name: String,
    pub metadata: CertificateMetadata,
    pub confidence_score: u8,
    pub authenticity: String,
    pub validation_date: String,
    pub processing_time: u32,
    pub issues: Vec<String>,
}

/// Snapshot of a validation outcome, hashed and embedded in QR codes.
/// Do not reorder fields; the hash depends on this serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMetadata {
    pub certificate_id: String,
    pub student_name: String,
    pub institution: String,
    pub graduation_date: String,
    pub validation_date: String,
    pub confidence_score: u8,
    pub authenticity: String,
    /// Moment this snapshot was taken, ISO-8601 UTC.
    pub timestamp: String,
    pub version: String,
}

impl VerificationMetadata {
    /// Build a snapshot from an arbitrary, possibly partial certificate
    /// record. Every missing or empty field takes its default here and
    /// nowhere else: certificate id falls back to "UNKNOWN", names and
    /// dates to the empty string, authenticity to "unknown", the score
    /// to 0 and the validation date to the fresh snapshot timestamp.
    pub fn normalize(data: &Value) -> Self {
        let timestamp = now_iso();

        let text = |pointer: &str| {
            data.pointer(pointer)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        };
        let or_default = |value: String, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        };

        let confidence_score = data
            .pointer("/confidenceScore")
            .and_then(Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
            .unwrap_or(0);

        Self {
            certificate_id: or_default(text("/metadata/certificateId"), "UNKNOWN"),
            student_name: text("/metadata/studentName"),
            institution: text("/metadata/institution"),
            graduation_date: text("/metadata/graduationDate"),
            validation_date: or_default(text("/validationDate"), &timestamp),
            confidence_score,
            authenticity: or_default(text("/authenticity"), "unknown"),
            timestamp,
            version: METADATA_VERSION.to_string(),
        }
    }

    /// Build a snapshot from a complete in-memory record.
    pub fn from_certificate(data: &CertificateData) -> ArtifactResult<Self> {
        Ok(Self::normalize(&serde_json::to_value(data)?))
    }
}
