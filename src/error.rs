use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

/// Why token verification failed.
///
/// Kinds are kept distinct for logging only; every one of them renders
/// as the same 401 body so a caller cannot probe whether a token was
/// missing, forged, expired, or orphaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("no token in cookie or Authorization header")]
    NoToken,
    #[error("signature or signing algorithm rejected")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("claims missing or malformed")]
    MalformedClaims,
    #[error("subject user no longer exists")]
    SubjectNotFound,
}

/// Application-level error for HTTP handlers; produces consistent
/// `{"error": ...}` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("username or email already taken")]
    DuplicateCredential,

    /// Login failure. Deliberately the same for an unknown username and
    /// a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Unauthorized(#[from] AuthFailure),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DuplicateCredential => (StatusCode::CONFLICT, self.to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            ApiError::Unauthorized(kind) => {
                warn!(%kind, "request rejected");
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Database(err) => classify_sqlx_error(err),
            ApiError::Internal(err) => {
                error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Classify a sqlx error into a status and client-safe message.
///
/// - `RowNotFound` maps to 404.
/// - A Postgres unique violation (23505) on one of our `uq_*` indexes is
///   a credential collision, not a server fault.
/// - Everything else is logged and surfaced as a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505")
                && db_err.constraint().map_or(false, |c| c.starts_with("uq_"))
            {
                return (
                    StatusCode::CONFLICT,
                    "username or email already taken".to_string(),
                );
            }
            error!(error = %db_err, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
        other => {
            error!(error = %other, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}
