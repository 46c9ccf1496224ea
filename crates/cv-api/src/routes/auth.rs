//! Authentication routes

use crate::error::{ApiError, ApiJson};
use crate::extract::bearer_token;
use crate::models::UserRecord;
use crate::session::random_suffix;
use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use cv_core::now_iso;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

pub const DEMO_EMAIL: &str = "demo@test.com";
pub const DEMO_PASSWORD: &str = "password123";
const DEMO_USER_ID: &str = "demo_user_12345";

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
}

#[derive(Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Startup hook: seeds the demo account if it does not exist yet.
pub async fn init(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    info!("Certificate validation service initializing");

    match seed_demo_user(&state) {
        Ok(()) => Ok(Json(json!({ "message": "Service initialized successfully" }))),
        Err(err) => {
            error!("Initialization error: {}", err);
            Err(ApiError::internal("Initialization failed"))
        }
    }
}

fn seed_demo_user(state: &AppState) -> Result<(), ApiError> {
    let index_key = format!("user_email:{}", DEMO_EMAIL);
    if state.store.get::<String>(&index_key)?.is_some() {
        return Ok(());
    }

    let user = UserRecord {
        id: DEMO_USER_ID.to_string(),
        email: DEMO_EMAIL.to_string(),
        name: "Demo User".to_string(),
        institution: "Demo University".to_string(),
        role: "user".to_string(),
        department: "Computer Science".to_string(),
        password_hash: bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST)?,
        created_at: now_iso(),
    };
    state.store.set(&format!("user:{}", user.id), &user)?;
    state.store.set(&index_key, &user.id)?;
    info!("Demo user created");
    Ok(())
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<Json<Value>, ApiError> {
    info!("Signup attempt for {}", req.email);

    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Missing required fields"));
    }

    let index_key = format!("user_email:{}", req.email);
    if state.store.get::<String>(&index_key)?.is_some() {
        return Err(ApiError::bad_request("User with this email already exists"));
    }

    let role = if req.role.is_empty() {
        "user".to_string()
    } else {
        req.role
    };
    let user = UserRecord {
        id: format!("user_{}_{}", Utc::now().timestamp_millis(), random_suffix(9)),
        email: req.email,
        name: req.name,
        institution: req.institution,
        role,
        department: req.department,
        password_hash: bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?,
        created_at: now_iso(),
    };

    state.store.set(&format!("user:{}", user.id), &user)?;
    state.store.set(&index_key, &user.id)?;

    // A session is provisioned up front; signin hands it out
    state.sessions.create(&user)?;
    info!("User {} created", user.id);

    Ok(Json(json!({
        "message": "User created successfully",
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
        }
    })))
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SigninRequest>,
) -> Result<Json<Value>, ApiError> {
    info!("Signin attempt for {}", req.email);

    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user_id = state
        .store
        .get::<String>(&format!("user_email:{}", req.email))?;
    let Some(user_id) = user_id else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let Some(user) = state.store.get::<UserRecord>(&format!("user:{}", user_id))? else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };
    if !bcrypt::verify(&req.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let session = state.sessions.create(&user)?;
    info!("User {} signed in", user.id);

    Ok(Json(json!({
        "message": "Signed in successfully",
        "session": session,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
        }
    })))
}

pub async fn signout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = bearer_token(&headers) else {
        return Err(ApiError::unauthorized("Authorization token required"));
    };

    state.sessions.revoke(token)?;
    Ok(Json(json!({ "message": "Signed out successfully" })))
}
