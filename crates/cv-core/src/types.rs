//! Domain types for certificate validation results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Three-way authenticity classification for a validated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authenticity {
    Authentic,
    Suspicious,
    Forged,
}

impl Authenticity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Authenticity::Authentic => "authentic",
            Authenticity::Suspicious => "suspicious",
            Authenticity::Forged => "forged",
        }
    }
}

impl std::fmt::Display for Authenticity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive fields extracted from (or attributed to) a certificate.
/// All free-form strings; nothing here is unique or validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateMetadata {
    pub certificate_id: String,
    pub student_name: String,
    pub degree: String,
    pub institution: String,
    pub graduation_date: String,
}

/// Named sub-scores (0-100) from the technical analysis passes.
/// Ordered map so serialized output is stable.
pub type TechnicalAnalysis = BTreeMap<String, u8>;

/// Outcome of validating one uploaded document. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub file_name: String,
    pub file_size: u64,
    pub authenticity: Authenticity,
    /// Overall confidence, 0-100.
    pub confidence_score: u8,
    /// Human-readable anomaly descriptions, in detection order.
    pub issues: Vec<String>,
    /// Simulated analysis duration in milliseconds.
    pub processing_time: u32,
    pub metadata: CertificateMetadata,
    pub technical_analysis: TechnicalAnalysis,
}
