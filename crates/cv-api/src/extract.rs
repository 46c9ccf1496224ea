//! Request authentication

use crate::error::ApiError;
use crate::session::AuthedUser;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::error;

/// Token portion of an `Authorization` header, taken as the second
/// whitespace-separated word (`Bearer <token>`).
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(' ').nth(1))
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(ApiError::unauthorized("Authorization token required"));
        };

        match state.sessions.authenticate(token) {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ApiError::unauthorized("Invalid authorization token")),
            Err(err) => {
                error!("Authentication error: {}", err);
                Err(ApiError::unauthorized("Invalid authorization token"))
            }
        }
    }
}
