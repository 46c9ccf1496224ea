//! Verification Artifact Pipeline
//!
//! Builds the downloadable proof artifacts for a completed validation:
//! the verification hash, the QR payload and its PNG rendering, the
//! watermarked PDF certificate and the JSON verification file, plus
//! the structural checker for scanned QR payloads.
//!
//! The typical issuance flow:
//!
//! ```text
//! ValidationResult
//!   -> CertificateData
//!   -> VerificationMetadata (normalized defaults)
//!   -> QrPayload -> PNG data URI
//!   -> PDF certificate / verification file
//! ```

pub mod error;
pub mod hash;
pub mod metadata;
pub mod pdf;
pub mod qr;
pub mod verification_file;
pub mod verify;
pub mod watermark;

pub use error::{ArtifactError, ArtifactResult};
pub use hash::verification_hash;
pub use metadata::{CertificateData, VerificationMetadata, METADATA_VERSION};
pub use pdf::render_certificate;
pub use qr::{build_payload, payload_data_uri, text_data_uri, QrPayload};
pub use verification_file::{build_verification_file, VerificationFile};
pub use verify::{validate_qr_data, validate_qr_data_at, QrCheck};
pub use watermark::WatermarkOptions;
