use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod storage;

// Module for routing segregation (Public, Admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point
// (main.rs, bin/create-admin.rs) and to integration tests.
pub use auth::JwtCodec;
pub use config::AppConfig;
pub use repository::{PostgresRepository, Repository, RepositoryState};
pub use storage::{LocalMediaStore, MediaStore, MockMediaStore, StorageState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas decorated with the
/// `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health, handlers::login, handlers::refresh,
        handlers::list_portfolios, handlers::get_portfolio, handlers::create_portfolio,
        handlers::update_portfolio, handlers::delete_portfolio,
        handlers::list_reviews, handlers::review_stats, handlers::get_review,
        handlers::create_review, handlers::update_review, handlers::delete_review,
        handlers::list_columns, handlers::get_column, handlers::create_column,
        handlers::update_column, handlers::delete_column, handlers::record_column_view,
    ),
    components(
        schemas(
            models::LoginRequest, models::TokenResponse, models::TokenRefreshResponse,
            models::PortfolioResponse, models::ReviewResponse, models::ReviewStatsResponse,
            models::ColumnResponse, models::ColumnNavigation,
            models::PortfolioCategory, models::PortfolioVisibility, models::ColumnStatus,
            pagination::Paginated<models::PortfolioResponse>,
            pagination::Paginated<models::ReviewResponse>,
            pagination::Paginated<models::ColumnResponse>,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "studio-cms", description = "Studio content management API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe, immutable
/// container holding all application services and configuration, shared across
/// all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Media Layer: abstracts the upload tree on the local filesystem.
    pub storage: StorageState,
    /// Token Codec: issues and verifies the signed access/refresh tokens.
    pub codec: JwtCodec,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations let handlers and extractors selectively pull components
// from the shared AppState. The auth extractors depend on JwtCodec: FromRef.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for JwtCodec {
    fn from_ref(app_state: &AppState) -> JwtCodec {
        app_state.codec.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: auth exchanges and all reads. No extractor gate.
        .merge(public::public_routes())
        // Admin routes: every content mutation. The role check lives in the
        // AdminUser extractor inside each handler, so merging at the root keeps
        // GET and POST on the same path working together.
        .merge(admin::admin_routes())
        // Stored media served straight off the upload tree.
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns x-request-id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: extracts the
/// `x-request-id` header (if present) and includes it in the structured logging
/// metadata alongside the HTTP method and URI, so every log line for a single
/// request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
