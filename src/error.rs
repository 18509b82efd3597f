use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// ApiError
///
/// The application-wide error taxonomy. Every fallible handler returns
/// `Result<_, ApiError>` and the `IntoResponse` impl below is the single place
/// where faults are translated into HTTP responses. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, malformed, or expired credential. Maps to 401 and carries the
    /// bearer challenge so clients know which scheme is expected.
    #[error("{0}")]
    Authentication(String),

    /// A valid principal without the required role. Maps to 403.
    #[error("Not enough permissions")]
    Authorization,

    /// A well-formed identifier that matches no row. Maps to 404.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed identifier, invalid enum value, out-of-range pagination
    /// parameters, or a missing required form field. Maps to 400.
    #[error("{0}")]
    Validation(String),

    /// Unexpected storage-layer fault. The transaction has already rolled back
    /// by the time this surfaces; the client sees a generic server fault.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Media store write failure during create/update. Aborts the whole
    /// operation before any row is persisted.
    #[error(transparent)]
    Storage(#[from] std::io::Error),
}

/// ErrorBody
///
/// The structured error payload returned for every recovered fault: a
/// machine-distinguishable kind plus a human-readable detail string.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Authentication(_) => "authentication_failure",
            ApiError::Authorization => "authorization_failure",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation_failure",
            ApiError::Database(_) | ApiError::Storage(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Authentication(detail) => (StatusCode::UNAUTHORIZED, detail.clone()),
            ApiError::Authorization => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::Database(e) => {
                // Log the underlying fault for operators but return a generic detail.
                tracing::error!("database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Storage(e) => {
                tracing::error!("media store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            error: self.kind(),
            detail,
        });

        if status == StatusCode::UNAUTHORIZED {
            // The challenge signal: tells the client the bearer scheme is required.
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
