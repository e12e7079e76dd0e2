//! Axum extractor implementing the request guard.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use super::errors::AuthError;
use super::state::HasAuthState;
use super::types::AuthenticatedUser;
use super::validator::SessionValidator;

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Extractor for endpoints that require a live session.
///
/// Runs once per protected request, before the handler:
/// 1. missing bearer token is terminal;
/// 2. signature/shape failure is terminal;
/// 3. the session record is consulted last and is authoritative — a
///    logged-out session rejects even while the token's `exp` claim is
///    still in the future.
///
/// Read-only: the guard never mutates session state.
pub struct SessionAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for SessionAuth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::NoCredential)?;

        let claims = state
            .jwt()
            .validate(token)
            .map_err(|_| AuthError::InvalidCredential)?;

        let validator = SessionValidator::new(state.db().clone());
        if !validator.is_live(&claims.session_id).await {
            return Err(AuthError::SessionNotLive);
        }

        Ok(SessionAuth(AuthenticatedUser {
            user_uuid: claims.sub,
            email: claims.email,
            session_id: claims.session_id,
        }))
    }
}
