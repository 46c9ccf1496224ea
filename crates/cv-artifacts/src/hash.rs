//! Verification hash
//!
//! SHA-256 over the JSON serialization of a value, lowercase hex. The JSON
//! field order is the struct declaration order, so two serializations of
//! the same value always hash identically.

use crate::error::ArtifactResult;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hash a serializable value. Returns 64 lowercase hex characters.
pub fn verification_hash<T: Serialize>(value: &T) -> ArtifactResult<String> {
    let json = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        score: u8,
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = Sample {
            name: "diploma".to_string(),
            score: 92,
        };
        let b = Sample {
            name: "diploma".to_string(),
            score: 92,
        };
        assert_eq!(
            verification_hash(&a).unwrap(),
            verification_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_hash_shape() {
        let hash = verification_hash(&Sample {
            name: "diploma".to_string(),
            score: 92,
        })
        .unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn test_hash_is_field_sensitive() {
        let base = verification_hash(&Sample {
            name: "diploma".to_string(),
            score: 92,
        })
        .unwrap();
        let name_changed = verification_hash(&Sample {
            name: "transcript".to_string(),
            score: 92,
        })
        .unwrap();
        let score_changed = verification_hash(&Sample {
            name: "diploma".to_string(),
            score: 93,
        })
        .unwrap();

        assert_ne!(base, name_changed);
        assert_ne!(base, score_changed);
    }

    #[test]
    fn test_hash_matches_known_vector() {
        // SHA-256 of the exact JSON text {"name":"x","score":1}
        let hash = verification_hash(&Sample {
            name: "x".to_string(),
            score: 1,
        })
        .unwrap();
        let expected = {
            let mut hasher = Sha256::new();
            hasher.update(br#"{"name":"x","score":1}"#);
            hex::encode(hasher.finalize())
        };
        assert_eq!(hash, expected);
    }
}
