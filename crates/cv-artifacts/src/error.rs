//! Artifact pipeline errors

use thiserror::Error;

/// Errors from artifact generation. QR encoding is deliberately absent:
/// a QR that cannot be built yields an empty data URI, not an error.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("QR image decode error: {0}")]
    QrDecode(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;
