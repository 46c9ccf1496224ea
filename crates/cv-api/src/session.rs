//! Opaque bearer-token sessions
//!
//! Tokens are random `token_{millis}_{suffix}` strings stored at
//! `session:{token}` with a 24 hour expiry. Lookup deletes expired
//! sessions on sight. There is no renewal; clients sign in again.

use crate::models::UserRecord;
use crate::store::{KvStore, StoreError};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Session lifetime in seconds.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The stored session, returned verbatim to signin callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
    /// Expiry as epoch seconds.
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub user_metadata: SessionUserMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUserMetadata {
    pub name: String,
    pub role: String,
}

/// The resolved caller of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Random lowercase alphanumeric string, used for token and id
/// suffixes.
pub(crate) fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Session lifecycle over the shared store.
#[derive(Clone)]
pub struct SessionStore {
    store: KvStore,
}

impl SessionStore {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Issue a fresh session for the user.
    pub fn create(&self, user: &UserRecord) -> Result<Session, StoreError> {
        let token = format!(
            "token_{}_{}",
            Utc::now().timestamp_millis(),
            random_suffix(16)
        );
        let session = Session {
            access_token: token.clone(),
            user: SessionUser {
                id: user.id.clone(),
                email: user.email.clone(),
                user_metadata: SessionUserMetadata {
                    name: user.name.clone(),
                    role: user.role.clone(),
                },
            },
            expires_at: Utc::now().timestamp() + SESSION_TTL_SECS,
        };

        self.store.set(&format!("session:{}", token), &session)?;
        Ok(session)
    }

    /// Resolve a bearer token to its user. Expired sessions are removed
    /// and resolve to `None`. The stored user record wins over the
    /// session's embedded copy when both exist.
    pub fn authenticate(&self, token: &str) -> Result<Option<AuthedUser>, StoreError> {
        let key = format!("session:{}", token);
        let Some(session) = self.store.get::<Session>(&key)? else {
            return Ok(None);
        };

        if session.expires_at < Utc::now().timestamp() {
            self.store.del(&key)?;
            return Ok(None);
        }

        let user = self
            .store
            .get::<UserRecord>(&format!("user:{}", session.user.id))?;
        Ok(Some(match user {
            Some(u) => AuthedUser {
                id: u.id,
                email: u.email,
                name: u.name,
                role: u.role,
            },
            None => AuthedUser {
                id: session.user.id,
                email: session.user.email,
                name: session.user.user_metadata.name,
                role: session.user.user_metadata.role,
            },
        }))
    }

    pub fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.store.del(&format!("session:{}", token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserRecord {
        UserRecord {
            id: "user_1_abc".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane Smith".to_string(),
            institution: "Example University".to_string(),
            role: "user".to_string(),
            department: "Physics".to_string(),
            password_hash: "$2b$12$fake".to_string(),
            created_at: "2025-01-15T10:30:00.000Z".to_string(),
        }
    }

    fn store_with_user() -> (KvStore, UserRecord) {
        let store = KvStore::temporary().unwrap();
        let user = sample_user();
        store.set(&format!("user:{}", user.id), &user).unwrap();
        (store, user)
    }

    #[test]
    fn test_token_shape() {
        let (store, user) = store_with_user();
        let session = SessionStore::new(store).create(&user).unwrap();

        let parts: Vec<&str> = session.access_token.splitn(3, '_').collect();
        assert_eq!(parts[0], "token");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 16);
    }

    #[test]
    fn test_create_then_authenticate() {
        let (store, user) = store_with_user();
        let sessions = SessionStore::new(store);
        let session = sessions.create(&user).unwrap();

        let authed = sessions
            .authenticate(&session.access_token)
            .unwrap()
            .unwrap();
        assert_eq!(authed.id, user.id);
        assert_eq!(authed.email, user.email);
        assert_eq!(authed.role, "user");
    }

    #[test]
    fn test_expiry_is_24_hours_out() {
        let (store, user) = store_with_user();
        let session = SessionStore::new(store).create(&user).unwrap();

        let delta = session.expires_at - Utc::now().timestamp();
        assert!((SESSION_TTL_SECS - 2..=SESSION_TTL_SECS).contains(&delta));
    }

    #[test]
    fn test_expired_session_is_deleted_on_lookup() {
        let (store, user) = store_with_user();
        let sessions = SessionStore::new(store.clone());
        let mut session = sessions.create(&user).unwrap();

        session.expires_at = Utc::now().timestamp() - 1;
        let key = format!("session:{}", session.access_token);
        store.set(&key, &session).unwrap();

        assert!(sessions.authenticate(&session.access_token).unwrap().is_none());
        assert!(store.get::<Session>(&key).unwrap().is_none());
    }

    #[test]
    fn test_session_one_second_from_expiry_is_valid() {
        let (store, user) = store_with_user();
        let sessions = SessionStore::new(store.clone());
        let mut session = sessions.create(&user).unwrap();

        session.expires_at = Utc::now().timestamp() + 1;
        store
            .set(&format!("session:{}", session.access_token), &session)
            .unwrap();

        assert!(sessions.authenticate(&session.access_token).unwrap().is_some());
    }

    #[test]
    fn test_falls_back_to_embedded_user() {
        let store = KvStore::temporary().unwrap();
        let sessions = SessionStore::new(store);
        // user record never stored
        let session = sessions.create(&sample_user()).unwrap();

        let authed = sessions
            .authenticate(&session.access_token)
            .unwrap()
            .unwrap();
        assert_eq!(authed.name, "Jane Smith");
        assert_eq!(authed.email, "jane@example.com");
    }

    #[test]
    fn test_revoke_invalidates_token() {
        let (store, user) = store_with_user();
        let sessions = SessionStore::new(store);
        let session = sessions.create(&user).unwrap();

        sessions.revoke(&session.access_token).unwrap();
        assert!(sessions.authenticate(&session.access_token).unwrap().is_none());
    }

    #[test]
    fn test_unknown_token_is_none() {
        let store = KvStore::temporary().unwrap();
        let sessions = SessionStore::new(store);
        assert!(sessions.authenticate("token_0_nope").unwrap().is_none());
    }
}
