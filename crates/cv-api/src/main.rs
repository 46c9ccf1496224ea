//! Certificate Validation API Server

mod error;
mod extract;
mod models;
mod routes;
mod session;
mod store;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use session::SessionStore;
use std::sync::Arc;
use store::KvStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers
pub struct AppState {
    pub store: KvStore,
    pub sessions: SessionStore,
    pub validator: cv_core::Validator,
    pub config: AppConfig,
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: String,
    pub max_body_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            max_body_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Build the router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health and startup
        .route("/health", get(routes::health_check))
        .route("/init", get(routes::auth::init))

        // Authentication
        .route("/signup", post(routes::auth::signup))
        .route("/signin", post(routes::auth::signin))
        .route("/signout", post(routes::auth::signout))

        // Uploads and validation
        .route("/upload", post(routes::uploads::upload))
        .route("/validate", post(routes::validations::validate))
        .route("/validations", get(routes::validations::list_validations))
        .route("/stats", get(routes::validations::get_stats))

        // Artifact downloads
        .route("/validations/:id/certificate", get(routes::artifacts::download_certificate))
        .route("/validations/:id/verification", get(routes::artifacts::download_verification))

        // Public QR verification
        .route("/verify", post(routes::verify::verify_qr))

        // Body limit for uploads
        .layer(DefaultBodyLimit::max(state.config.max_body_size))

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cv_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Certificate Validation API Server");

    let config = AppConfig::default();

    // Create data directory
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");

    // Open the store
    let store_path = std::path::Path::new(&config.data_dir).join("kv");
    let store = KvStore::open(&store_path).expect("Failed to open store");

    info!("Store opened at {}", store_path.display());

    let sessions = SessionStore::new(store.clone());
    let validator = cv_core::Validator::new();

    // Create shared state
    let state = Arc::new(AppState {
        store,
        sessions,
        validator,
        config: config.clone(),
    });

    let router = app(state);

    // Start server
    let addr = config.bind_addr;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}
