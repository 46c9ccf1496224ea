//! Cryptographic QR payloads and PNG encoding
//!
//! The payload is the verification metadata plus its hash, a verify URL
//! and platform markers, serialized as JSON and rendered as a QR image.
//! Encoding failures (oversized payloads) degrade to an empty data URI;
//! callers treat `""` as "no QR" and omit the block.

use crate::error::ArtifactResult;
use crate::hash::verification_hash;
use crate::metadata::VerificationMetadata;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use cv_core::now_iso;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Base URL embedded in QR payloads for manual verification.
pub const VERIFY_URL_BASE: &str = "https://verify.authenledger.com/v";

/// QR payload format version.
pub const QR_VERSION: &str = "2.0";

/// Platform marker embedded in QR payloads.
pub const PLATFORM: &str = "AuthenLedger";

/// QR module color, the platform blue (#1e40af).
const DARK: image::Rgb<u8> = image::Rgb([30, 64, 175]);
const LIGHT: image::Rgb<u8> = image::Rgb([255, 255, 255]);

/// Minimum rendered QR size in pixels, sized for reliable scanning.
const MIN_QR_PIXELS: u32 = 200;

/// The complete QR payload. The flattened metadata serializes first, so
/// the wire order is the nine metadata fields followed by the five
/// payload fields below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    #[serde(flatten)]
    pub metadata: VerificationMetadata,
    /// Verification hash of the metadata, 64 lowercase hex chars.
    pub hash: String,
    pub verify_url: String,
    pub qr_version: String,
    pub generated: String,
    pub platform: String,
}

/// Assemble the QR payload for a metadata snapshot.
pub fn build_payload(metadata: &VerificationMetadata) -> ArtifactResult<QrPayload> {
    let hash = verification_hash(metadata)?;
    let verify_url = format!(
        "{}/{}?h={}",
        VERIFY_URL_BASE, metadata.certificate_id, hash
    );

    Ok(QrPayload {
        metadata: metadata.clone(),
        hash,
        verify_url,
        qr_version: QR_VERSION.to_string(),
        generated: now_iso(),
        platform: PLATFORM.to_string(),
    })
}

/// Render a payload as a PNG data URI. Empty string if it cannot be
/// encoded.
pub fn payload_data_uri(payload: &QrPayload) -> String {
    match serde_json::to_string(payload) {
        Ok(json) => text_data_uri(&json),
        Err(err) => {
            error!("QR code generation error: {}", err);
            String::new()
        }
    }
}

/// Render arbitrary text as a PNG data URI. Empty string if the text
/// exceeds QR capacity or the image cannot be encoded.
pub fn text_data_uri(text: &str) -> String {
    match encode_png(text) {
        Ok(png) => format!("data:image/png;base64,{}", BASE64.encode(png)),
        Err(err) => {
            error!("QR code generation error: {}", err);
            String::new()
        }
    }
}

fn encode_png(text: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
    let img = code
        .render::<image::Rgb<u8>>()
        .min_dimensions(MIN_QR_PIXELS, MIN_QR_PIXELS)
        .dark_color(DARK)
        .light_color(LIGHT)
        .build();

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_metadata() -> VerificationMetadata {
        VerificationMetadata::normalize(&json!({
            "metadata": {
                "certificateId": "CERT-ABC123XYZ",
                "studentName": "Jane Smith",
                "institution": "Example University",
                "graduationDate": "2024-06-01"
            },
            "confidenceScore": 91,
            "authenticity": "authentic",
            "validationDate": "2025-01-15T10:30:00.000Z"
        }))
    }

    #[test]
    fn test_payload_embeds_metadata_hash() {
        let metadata = sample_metadata();
        let payload = build_payload(&metadata).unwrap();
        assert_eq!(payload.hash, verification_hash(&metadata).unwrap());
        assert_eq!(payload.hash.len(), 64);
    }

    #[test]
    fn test_verify_url_carries_id_and_hash() {
        let metadata = sample_metadata();
        let payload = build_payload(&metadata).unwrap();
        assert_eq!(
            payload.verify_url,
            format!(
                "https://verify.authenledger.com/v/CERT-ABC123XYZ?h={}",
                payload.hash
            )
        );
    }

    #[test]
    fn test_payload_markers() {
        let payload = build_payload(&sample_metadata()).unwrap();
        assert_eq!(payload.qr_version, "2.0");
        assert_eq!(payload.platform, "AuthenLedger");
        assert!(!payload.generated.is_empty());
    }

    #[test]
    fn test_payload_wire_order() {
        let payload = build_payload(&sample_metadata()).unwrap();
        let json = serde_json::to_string(&payload).unwrap();

        let keys: Vec<usize> = [
            "certificateId",
            "studentName",
            "institution",
            "graduationDate",
            "validationDate",
            "confidenceScore",
            "authenticity",
            "timestamp",
            "version",
            "hash",
            "verifyUrl",
            "qrVersion",
            "generated",
            "platform",
        ]
        .iter()
        .map(|k| json.find(&format!("\"{}\"", k)).unwrap())
        .collect();

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted, "metadata fields must serialize first");
    }

    #[test]
    fn test_empty_text_still_encodes() {
        let uri = text_data_uri("");
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn test_oversized_text_degrades_to_empty_string() {
        // 4000 bytes exceeds what any QR version holds at EC level H
        let uri = text_data_uri(&"x".repeat(4000));
        assert_eq!(uri, "");
    }

    #[test]
    fn test_rendered_image_is_scannable_size() {
        let payload = build_payload(&sample_metadata()).unwrap();
        let uri = payload_data_uri(&payload);

        let b64 = uri.strip_prefix("data:image/png;base64,").unwrap();
        let png = BASE64.decode(b64).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();

        assert!(img.width() >= MIN_QR_PIXELS);
        assert!(img.height() >= MIN_QR_PIXELS);

        // quiet zone corner is rendered in the light color
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
    }
}
