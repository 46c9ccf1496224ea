//! Certificate Validation Engine
//!
//! This crate provides the domain model and scoring engine for the
//! AuthenLedger platform: uploaded documents are checked against the
//! acceptance policy, scored for authenticity, and classified for the
//! verification artifacts built on top of the results.

pub mod gate;
pub mod scorer;
pub mod status;
pub mod types;

use chrono::{SecondsFormat, Utc};
use std::path::Path;
use thiserror::Error;

pub use gate::{UploadPolicy, UploadRejection};
pub use scorer::{default_scorer, CertificateScorer, MockScorer};
pub use status::VerificationStatus;
pub use types::{Authenticity, CertificateMetadata, TechnicalAnalysis, ValidationResult};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload rejected: {0}")]
    Rejected(#[from] UploadRejection),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Main validation interface: gates incoming documents and scores them
/// with the configured scorer.
pub struct Validator {
    policy: UploadPolicy,
    scorer: Box<dyn CertificateScorer>,
}

impl Validator {
    /// Create a validator with the default policy and the simulated scorer.
    pub fn new() -> Self {
        Self::with_scorer(default_scorer())
    }

    /// Create a validator with a custom scorer.
    pub fn with_scorer(scorer: Box<dyn CertificateScorer>) -> Self {
        Self {
            policy: UploadPolicy::default(),
            scorer,
        }
    }

    /// Acceptance policy applied to uploads.
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Name of the scorer backing this validator.
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Score an already-accepted document by name and size.
    pub fn validate(&self, file_name: &str, file_size: u64) -> ValidationResult {
        self.scorer.score(file_name, file_size)
    }

    /// Gate and score a file on disk. The MIME type is guessed from the
    /// file extension.
    pub fn validate_file(&self, path: &Path) -> CoreResult<ValidationResult> {
        let meta = std::fs::metadata(path)?;
        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        self.policy.check(content_type.essence_str(), meta.len())?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(self.validate(&file_name, meta.len()))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// the timestamp shape used on every stored record and artifact.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validator_creation() {
        let validator = Validator::new();
        assert_eq!(validator.policy().max_file_size, 10 * 1024 * 1024);
        assert_eq!(validator.scorer_name(), "mock-scorer");
    }

    #[test]
    fn test_validate_carries_file_identity() {
        let validator = Validator::new();
        let result = validator.validate("diploma.pdf", 2048);
        assert_eq!(result.file_name, "diploma.pdf");
        assert_eq!(result.file_size, 2048);
    }

    #[test]
    fn test_validate_file_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .unwrap();
        file.write_all(b"%PDF-1.4 test document").unwrap();

        let validator = Validator::new();
        let result = validator.validate_file(file.path()).unwrap();
        assert_eq!(result.file_size, 22);
    }

    #[test]
    fn test_validate_file_rejects_unsupported_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".zip")
            .tempfile()
            .unwrap();
        file.write_all(b"PK").unwrap();

        let validator = Validator::new();
        let err = validator.validate_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Rejected(UploadRejection::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_now_iso_has_millisecond_precision() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        // 2026-08-25T12:34:56.789Z
        assert_eq!(ts.len(), 24);
    }
}
