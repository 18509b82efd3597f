use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines the routes accessible without any credential. Reads never consult
/// the token, so an expired access token does not break browsing.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe; no database or storage access.
        .route("/health", get(handlers::health))
        // POST /auth/login
        // Exchanges credentials for an access/refresh token pair.
        .route("/auth/login", post(handlers::login))
        // POST /auth/refresh
        // Exchanges a bearer REFRESH token for a fresh access token.
        .route("/auth/refresh", post(handlers::refresh))
        // Portfolio reads: paginated listing plus detail lookup.
        .route("/portfolios", get(handlers::list_portfolios))
        .route("/portfolios/{id}", get(handlers::get_portfolio))
        // Review reads. /reviews/stats must be registered alongside the
        // parameterized detail route; axum resolves the literal segment first.
        .route("/reviews", get(handlers::list_reviews))
        .route("/reviews/stats", get(handlers::review_stats))
        .route("/reviews/{id}", get(handlers::get_review))
        // Column reads: listing, detail with prev/next siblings, and the
        // anonymous view counter.
        .route("/columns", get(handlers::list_columns))
        .route("/columns/{id}", get(handlers::get_column))
        .route("/columns/{id}/view", post(handlers::record_column_view))
}
