//! Structural checks for scanned QR payloads
//!
//! These checks confirm the payload has the expected shape and a
//! timestamp within the accepted window. They do not recompute the
//! hash and are not tamper evidence.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

/// Accepted age for a payload timestamp.
const MAX_AGE_DAYS: i64 = 5 * 365;

/// Outcome of a QR payload check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QrCheck {
    fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn invalid(error: &str) -> Self {
        Self {
            is_valid: false,
            error: Some(error.to_string()),
        }
    }
}

/// Check a scanned QR payload against the current clock.
pub fn validate_qr_data(qr_data: &Value) -> QrCheck {
    validate_qr_data_at(qr_data, Utc::now())
}

/// Clock-injected variant of [`validate_qr_data`].
///
/// A timestamp that does not parse as RFC 3339 is rejected with the
/// same message as an out-of-window one.
pub fn validate_qr_data_at(qr_data: &Value, now: DateTime<Utc>) -> QrCheck {
    if string_field(qr_data, "certificateId").is_none() {
        return QrCheck::invalid("Missing certificate ID");
    }

    match string_field(qr_data, "hash") {
        Some(hash) if hash.len() == 64 => {}
        _ => return QrCheck::invalid("Invalid or missing cryptographic hash"),
    }

    let Some(timestamp) = string_field(qr_data, "timestamp") else {
        return QrCheck::invalid("Missing timestamp");
    };

    let oldest = now - Duration::days(MAX_AGE_DAYS);
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => {
            let ts = parsed.with_timezone(&Utc);
            if ts < oldest || ts > now {
                return QrCheck::invalid("Invalid timestamp - certificate too old or future dated");
            }
        }
        Err(_) => {
            return QrCheck::invalid("Invalid timestamp - certificate too old or future dated");
        }
    }

    QrCheck::valid()
}

/// Non-empty string field, treating `""` the same as absent.
fn string_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "certificateId": "CERT-ABC123XYZ",
            "studentName": "Jane Smith",
            "institution": "Example University",
            "hash": "a".repeat(64),
            "timestamp": Utc::now().to_rfc3339(),
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        let check = validate_qr_data(&sample_payload());
        assert!(check.is_valid);
        assert_eq!(check.error, None);
    }

    #[test]
    fn test_missing_certificate_id() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("certificateId");
        let check = validate_qr_data(&payload);
        assert_eq!(check.error.as_deref(), Some("Missing certificate ID"));

        payload["certificateId"] = json!("");
        let check = validate_qr_data(&payload);
        assert_eq!(check.error.as_deref(), Some("Missing certificate ID"));
    }

    #[test]
    fn test_hash_must_be_64_chars() {
        let mut payload = sample_payload();
        payload["hash"] = json!("a".repeat(63));
        let check = validate_qr_data(&payload);
        assert_eq!(
            check.error.as_deref(),
            Some("Invalid or missing cryptographic hash")
        );

        payload.as_object_mut().unwrap().remove("hash");
        let check = validate_qr_data(&payload);
        assert_eq!(
            check.error.as_deref(),
            Some("Invalid or missing cryptographic hash")
        );
    }

    #[test]
    fn test_missing_timestamp() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("timestamp");
        let check = validate_qr_data(&payload);
        assert_eq!(check.error.as_deref(), Some("Missing timestamp"));
    }

    #[test]
    fn test_timestamp_window() {
        let now = Utc::now();
        let mut payload = sample_payload();

        payload["timestamp"] = json!((now - Duration::days(6 * 365)).to_rfc3339());
        let check = validate_qr_data_at(&payload, now);
        assert_eq!(
            check.error.as_deref(),
            Some("Invalid timestamp - certificate too old or future dated")
        );

        payload["timestamp"] = json!((now + Duration::seconds(1)).to_rfc3339());
        let check = validate_qr_data_at(&payload, now);
        assert!(!check.is_valid);

        // boundaries are inclusive
        payload["timestamp"] = json!(now.to_rfc3339());
        assert!(validate_qr_data_at(&payload, now).is_valid);

        payload["timestamp"] = json!((now - Duration::days(MAX_AGE_DAYS)).to_rfc3339());
        assert!(validate_qr_data_at(&payload, now).is_valid);
    }

    #[test]
    fn test_unparseable_timestamp_rejected() {
        let mut payload = sample_payload();
        payload["timestamp"] = json!("not-a-date");
        let check = validate_qr_data(&payload);
        assert_eq!(
            check.error.as_deref(),
            Some("Invalid timestamp - certificate too old or future dated")
        );
    }

    #[test]
    fn test_wire_shape() {
        let valid = serde_json::to_value(QrCheck::valid()).unwrap();
        assert_eq!(valid, json!({"isValid": true}));

        let invalid = serde_json::to_value(QrCheck::invalid("Missing timestamp")).unwrap();
        assert_eq!(
            invalid,
            json!({"isValid": false, "error": "Missing timestamp"})
        );
    }

    #[test]
    fn test_round_tripped_payload_passes() {
        use crate::metadata::VerificationMetadata;
        use crate::qr;

        let metadata = VerificationMetadata::normalize(&json!({
            "metadata": {"certificateId": "CERT-XYZ987"},
            "confidenceScore": 88,
            "authenticity": "authentic"
        }));
        let payload = qr::build_payload(&metadata).unwrap();
        let as_value = serde_json::to_value(&payload).unwrap();
        assert!(validate_qr_data(&as_value).is_valid);
    }
}
