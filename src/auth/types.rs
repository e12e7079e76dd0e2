//! Authentication user types.

/// Authenticated identity produced by the request guard.
///
/// Threaded to handlers as a plain extracted value; anything that needs
/// the caller's session (logout, for one) takes it from here rather than
/// from request input.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User UUID from the token subject
    pub user_uuid: String,
    /// User email
    pub email: String,
    /// Session record ID backing this request
    pub session_id: String,
}
