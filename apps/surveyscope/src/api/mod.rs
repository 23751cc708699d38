//! # Surveyscope HTTP API Module
//!
//! JSON dashboard API over one in-memory workspace.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /upload` - Ingest a batch of base64-encoded files
//! - `DELETE /workspace` - Drop every stored upload
//! - `GET /overview` - Per-team availability and company counts
//! - `GET /teams/{slug}/themes` - Themes view of one team
//! - `GET /teams/{slug}/questions?theme=` - Questions view of one team
//! - `GET /teams/{slug}/comments` - Comments view of one team
//! - `GET /company` - Company-wide view
//! - `GET /reports/teams/{slug}` - Team report download
//! - `GET /reports/company` - Company report download
//! - `POST /insights` - Single-table survey insights
//! - `POST /insights/report` - Single-table Markdown report
//! - `POST /insights/pdf` - Single-table PDF report
//! - `POST /publish` - Push a report to Google Docs
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `SURVEYSCOPE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `SURVEYSCOPE_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `SURVEYSCOPE_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    AckResponse, CommentsResponse, CompanyResponse, ErrorResponse, FilePayload, HealthResponse,
    InsightsResponse, PublishRequest, PublishResponse, QuestionsQuery, QuestionsResponse,
    ThemesResponse, UploadRequest, UploadResponse,
};

use crate::config::AppConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use surveyscope_core::{SurveyError, Workspace};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// Uploads of the running process.
    pub workspace: Arc<RwLock<Workspace>>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state with an empty workspace built from the configured teams.
    pub fn new(config: AppConfig) -> Result<Self, SurveyError> {
        let workspace = Workspace::new(config.directory()?);
        Ok(Self::with_workspace(workspace, config))
    }

    /// Create state around an existing workspace.
    #[must_use]
    pub fn with_workspace(workspace: Workspace, config: AppConfig) -> Self {
        Self {
            workspace: Arc::new(RwLock::new(workspace)),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// Build CORS layer from `SURVEYSCOPE_CORS_ORIGINS`.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("SURVEYSCOPE_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (SURVEYSCOPE_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SURVEYSCOPE_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(ALLOWED_METHODS)
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No SURVEYSCOPE_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Localhost-only CORS layer.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing
/// 2. CORS
/// 3. Body limit (`server.max_upload_bytes`)
/// 4. Rate limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();
    let body_limit = state.config.server.max_upload_bytes;

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set SURVEYSCOPE_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/upload", post(handlers::upload_handler))
        .route("/workspace", delete(handlers::clear_handler))
        .route("/overview", get(handlers::overview_handler))
        .route("/teams/{slug}/themes", get(handlers::themes_handler))
        .route("/teams/{slug}/questions", get(handlers::questions_handler))
        .route("/teams/{slug}/comments", get(handlers::comments_handler))
        .route("/company", get(handlers::company_handler))
        .route("/reports/teams/{slug}", get(handlers::team_report_handler))
        .route("/reports/company", get(handlers::company_report_handler))
        .route("/insights", post(handlers::insights_handler))
        .route("/insights/report", post(handlers::insights_report_handler))
        .route("/insights/pdf", post(handlers::insights_pdf_handler))
        .route("/publish", post(handlers::publish_handler));

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), SurveyError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SurveyError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Surveyscope HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| SurveyError::IoError(format!("Server error: {}", e)))
}
