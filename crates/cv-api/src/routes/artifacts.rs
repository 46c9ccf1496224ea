//! Artifact download routes
//!
//! Certificate PDFs and verification files are generated on demand
//! from the stored validation record; nothing is cached.

use crate::error::ApiError;
use crate::models::ValidationRecord;
use crate::session::AuthedUser;
use crate::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use chrono::{Datelike, Utc};
use cv_artifacts::{
    build_payload, build_verification_file, payload_data_uri, render_certificate, ArtifactResult,
    CertificateData, VerificationMetadata, WatermarkOptions,
};
use std::sync::Arc;
use tracing::error;

pub async fn download_certificate(
    State(state): State<Arc<AppState>>,
    user: AuthedUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = owned_validation(&state, &user, &id)?;
    let data = certificate_data(&record);

    let pdf = generate_pdf(&data).map_err(|err| {
        error!("Certificate generation error: {}", err);
        ApiError::internal("Certificate generation failed")
    })?;

    let filename = format!("verified-certificate-{}.pdf", data.metadata.certificate_id);
    Ok(attachment(pdf.into(), "application/pdf", &filename))
}

pub async fn download_verification(
    State(state): State<Arc<AppState>>,
    user: AuthedUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = owned_validation(&state, &user, &id)?;
    let data = certificate_data(&record);

    let body = build_verification_file(&data)
        .and_then(|file| file.pretty_json())
        .map_err(|err| {
            error!("Verification file generation error: {}", err);
            ApiError::internal("Verification file generation failed")
        })?;

    let filename = format!("verification-{}.json", data.metadata.certificate_id);
    Ok(attachment(body.into(), "application/json", &filename))
}

/// Metadata normalization, hash, QR and page render in one pass. An
/// oversized QR payload degrades to a PDF without the QR block.
fn generate_pdf(data: &CertificateData) -> ArtifactResult<Vec<u8>> {
    let metadata = VerificationMetadata::from_certificate(data)?;
    let payload = build_payload(&metadata)?;
    let qr_uri = payload_data_uri(&payload);
    let watermark =
        WatermarkOptions::for_institution(&data.metadata.institution, Utc::now().year());
    render_certificate(data, &qr_uri, &watermark)
}

fn owned_validation(
    state: &AppState,
    user: &AuthedUser,
    id: &str,
) -> Result<ValidationRecord, ApiError> {
    let record = state.store.get::<ValidationRecord>(id)?;
    record
        .filter(|record| record.user_id == user.id)
        .ok_or_else(|| ApiError::not_found("Validation not found"))
}

fn certificate_data(record: &ValidationRecord) -> CertificateData {
    CertificateData {
        file_name: record.result.file_name.clone(),
        metadata: record.result.metadata.clone(),
        confidence_score: record.result.confidence_score,
        authenticity: record.result.authenticity.as_str().to_string(),
        validation_date: record.validated_at.clone(),
        processing_time: record.result.processing_time,
        issues: record.result.issues.clone(),
    }
}

fn attachment(body: Body, content_type: &str, filename: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
        .unwrap()
}
