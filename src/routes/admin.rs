use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, post, put},
};

/// Admin Router Module
///
/// Defines every content mutation. All handlers here take the `AdminUser`
/// extractor: a request without a valid ACCESS token is rejected 401, and a
/// valid token without the Admin role is rejected 403, before any form parsing
/// or storage work happens.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // Portfolio lifecycle. Create/update consume multipart forms with the
        // image file part; delete is physical removal.
        .route("/portfolios", post(handlers::create_portfolio))
        .route("/portfolios/{id}", put(handlers::update_portfolio))
        .route("/portfolios/{id}", delete(handlers::delete_portfolio))
        // Review lifecycle. The `images` form field may repeat; supplying any
        // files on update replaces the whole attachment set.
        .route("/reviews", post(handlers::create_review))
        .route("/reviews/{id}", put(handlers::update_review))
        .route("/reviews/{id}", delete(handlers::delete_review))
        // Column lifecycle.
        .route("/columns", post(handlers::create_column))
        .route("/columns/{id}", put(handlers::update_column))
        .route("/columns/{id}", delete(handlers::delete_column))
}
