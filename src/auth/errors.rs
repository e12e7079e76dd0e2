//! Authentication error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Rejections produced by the request guard. All are terminal for the
/// request and none reveals which token check failed.
#[derive(Debug)]
pub enum AuthError {
    /// No bearer token in the Authorization header
    NoCredential,
    /// Signature, shape, or claim-expiry check failed
    InvalidCredential,
    /// The session record is invalidated, expired, or missing
    SessionNotLive,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::NoCredential => "No credential provided",
            AuthError::InvalidCredential => "Invalid credential",
            AuthError::SessionNotLive => "Session invalid or expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use axum::Json;
        use serde::Serialize;

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
