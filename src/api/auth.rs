//! Authentication API endpoints.
//!
//! - POST `/signup` - Create a user, open a session, return a signed token
//! - POST `/login` - Verify credentials, open a fresh session, return a token
//! - POST `/logout` - Invalidate the caller's own session
//!
//! Login never reuses an existing session: every successful credential
//! presentation opens a new record with its own token.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use super::error::{ApiError, ResultExt};
use crate::auth::SessionAuth;
use crate::db::Database;
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;
use crate::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub session_ttl_secs: u64,
}

impl_has_auth_state!(AuthState);

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(state)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
    #[serde(rename = "firstName", default)]
    first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    last_name: Option<String>,
}

#[derive(Serialize)]
struct TokenResponse {
    access_token: String,
}

/// Open a session record for the user, then sign a token against it. The
/// token's `exp` claim is the record's `expires_at`, not a second clock
/// reading.
async fn issue_session(
    state: &AuthState,
    user_id: i64,
    user_uuid: &str,
    email: &str,
) -> Result<TokenResponse, ApiError> {
    let session = state
        .db
        .sessions()
        .create(user_id, state.session_ttl_secs)
        .await
        .db_err("Failed to create session")?;

    let token = state
        .jwt
        .issue(user_uuid, email, &session.id, session.expires_at as u64)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::internal("Failed to issue token")
        })?;

    Ok(TokenResponse {
        access_token: token,
    })
}

async fn signup(
    State(state): State<AuthState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim();

    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email is required"));
    }

    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to process credentials")
    })?;

    let uuid = uuid::Uuid::new_v4().to_string();

    match state
        .db
        .users()
        .create(
            &uuid,
            email,
            &password_hash,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
        )
        .await
    {
        Ok(user_id) => {
            info!(user = %uuid, "User created");
            let response = issue_session(&state, user_id, &uuid, email).await?;
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::forbidden("Credentials taken"))
        }
        Err(e) => Err(ApiError::db_error("Failed to create user", e)),
    }
}

async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(payload.email.trim())
        .await
        .db_err("Failed to look up user")?;

    // Unknown email and wrong password produce the same rejection so the
    // response cannot be used to enumerate accounts.
    let Some(user) = user else {
        return Err(ApiError::forbidden("Credentials incorrect"));
    };

    let password_valid = verify_password(&user.password_hash, &payload.password).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::internal("Failed to process credentials")
    })?;

    if !password_valid {
        return Err(ApiError::forbidden("Credentials incorrect"));
    }

    info!(user = %user.uuid, "User logged in");
    let response = issue_session(&state, user.id, &user.uuid, &user.email).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Logout invalidates the session named by the caller's authenticated
/// identity — never one taken from request input. Always reports success;
/// the store treats an already-gone session as a no-op.
async fn logout(
    State(state): State<AuthState>,
    SessionAuth(auth): SessionAuth,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .sessions()
        .invalidate(&auth.session_id)
        .await
        .db_err("Failed to invalidate session")?;

    info!(session = %auth.session_id, "Session invalidated");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    ))
}
