//! Three-way verification status ladder
//!
//! Single source of truth for the badge shown on rendered certificates.
//! The thresholds are compared against the raw authenticity string so the
//! ladder also works on normalized metadata, where authenticity may be
//! "unknown".

/// Badge classification for a validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    VerifiedAuthentic,
    RequiresReview,
    PotentiallyForged,
}

impl VerificationStatus {
    /// Classify an outcome. Only an authentic document scoring 85 or above
    /// earns the verified badge; 70-84 lands in review regardless of
    /// authenticity; everything else is treated as potentially forged.
    pub fn classify(authenticity: &str, confidence_score: u8) -> Self {
        if authenticity == "authentic" && confidence_score >= 85 {
            VerificationStatus::VerifiedAuthentic
        } else if confidence_score >= 70 {
            VerificationStatus::RequiresReview
        } else {
            VerificationStatus::PotentiallyForged
        }
    }

    /// Label printed inside the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::VerifiedAuthentic => "VERIFIED AUTHENTIC",
            VerificationStatus::RequiresReview => "REQUIRES REVIEW",
            VerificationStatus::PotentiallyForged => "POTENTIALLY FORGED",
        }
    }

    /// Badge fill color as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            VerificationStatus::VerifiedAuthentic => (34, 197, 94),
            VerificationStatus::RequiresReview => (245, 158, 11),
            VerificationStatus::PotentiallyForged => (239, 68, 68),
        }
    }

    /// Badge fill color as a CSS hex string.
    pub fn hex(&self) -> &'static str {
        match self {
            VerificationStatus::VerifiedAuthentic => "#22c55e",
            VerificationStatus::RequiresReview => "#f59e0b",
            VerificationStatus::PotentiallyForged => "#ef4444",
        }
    }
}
