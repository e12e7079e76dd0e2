//! User API endpoints.

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::SessionAuth;
use crate::db::Database;
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_state!(UsersState);

pub fn router(state: UsersState) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}

#[derive(Serialize)]
struct MeResponse {
    #[serde(rename = "userId")]
    user_id: String,
    email: String,
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Return the caller's authenticated identity. Doubles as the protected
/// liveness probe: any endpoint behind `SessionAuth` behaves the same way.
async fn me(SessionAuth(auth): SessionAuth) -> impl IntoResponse {
    Json(MeResponse {
        user_id: auth.user_uuid,
        email: auth.email,
        session_id: auth.session_id,
    })
}
