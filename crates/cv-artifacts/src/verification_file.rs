//! Downloadable verification file
//!
//! A JSON companion document for a validated certificate. It restates
//! the validation outcome together with a hash of the full certificate
//! record, so the two downloads can be cross-checked offline.

use crate::error::ArtifactResult;
use crate::hash::verification_hash;
use crate::metadata::CertificateData;
use cv_core::{now_iso, CertificateMetadata};
use serde::Serialize;

/// Verification file format version.
pub const FILE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFile {
    pub certificate_id: String,
    pub validation_timestamp: String,
    pub authenticity: String,
    pub confidence_score: u8,
    pub metadata: CertificateMetadata,
    pub issues: Vec<String>,
    /// Hash of the complete certificate record, 64 lowercase hex chars.
    pub cryptographic_hash: String,
    pub generated_at: String,
    pub version: String,
}

impl VerificationFile {
    /// Two-space indented JSON, the download wire format.
    pub fn pretty_json(&self) -> ArtifactResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the verification file for a certificate record.
pub fn build_verification_file(data: &CertificateData) -> ArtifactResult<VerificationFile> {
    Ok(VerificationFile {
        certificate_id: data.metadata.certificate_id.clone(),
        validation_timestamp: data.validation_date.clone(),
        authenticity: data.authenticity.clone(),
        confidence_score: data.confidence_score,
        metadata: data.metadata.clone(),
        issues: data.issues.clone(),
        cryptographic_hash: verification_hash(data)?,
        generated_at: now_iso(),
        version: FILE_VERSION.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> CertificateData {
        CertificateData {
            file_name: "diploma.pdf".to_string(),
            metadata: CertificateMetadata {
                certificate_id: "CERT-TEST12345".to_string(),
                student_name: "Jane Smith".to_string(),
                degree: "Bachelor of Science".to_string(),
                institution: "Example University".to_string(),
                graduation_date: "2024-06-01".to_string(),
            },
            confidence_score: 92,
            authenticity: "authentic".to_string(),
            validation_date: "2025-01-15T10:30:00.000Z".to_string(),
            processing_time: 2100,
            issues: vec!["Date format anomaly".to_string()],
        }
    }

    #[test]
    fn test_carries_record_fields() {
        let data = sample_data();
        let file = build_verification_file(&data).unwrap();

        assert_eq!(file.certificate_id, "CERT-TEST12345");
        assert_eq!(file.validation_timestamp, "2025-01-15T10:30:00.000Z");
        assert_eq!(file.authenticity, "authentic");
        assert_eq!(file.confidence_score, 92);
        assert_eq!(file.metadata.student_name, "Jane Smith");
        assert_eq!(file.issues, vec!["Date format anomaly".to_string()]);
        assert_eq!(file.version, "1.0");
    }

    #[test]
    fn test_hash_covers_whole_record() {
        let data = sample_data();
        let file = build_verification_file(&data).unwrap();
        assert_eq!(file.cryptographic_hash, verification_hash(&data).unwrap());
        assert_eq!(file.cryptographic_hash.len(), 64);

        let mut changed = sample_data();
        changed.processing_time = 9999;
        let other = build_verification_file(&changed).unwrap();
        assert_ne!(file.cryptographic_hash, other.cryptographic_hash);
    }

    #[test]
    fn test_wire_field_order() {
        let file = build_verification_file(&sample_data()).unwrap();
        let json = serde_json::to_string(&file).unwrap();

        let keys: Vec<usize> = [
            "certificateId",
            "validationTimestamp",
            "authenticity",
            "confidenceScore",
            "metadata",
            "issues",
            "cryptographicHash",
            "generatedAt",
            "version",
        ]
        .iter()
        .map(|k| json.find(&format!("\"{}\"", k)).unwrap())
        .collect();

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let file = build_verification_file(&sample_data()).unwrap();
        let pretty = file.pretty_json().unwrap();
        assert!(pretty.contains("\n  \"certificateId\""));
    }
}
