mod auth;
mod error;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, session_ttl_secs: u64) -> Router {
    let auth_state = auth::AuthState {
        db: db.clone(),
        jwt: jwt.clone(),
        session_ttl_secs,
    };

    let users_state = users::UsersState { db, jwt };

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .nest("/users", users::router(users_state))
}
