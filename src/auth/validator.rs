//! Session liveness decisions.
//!
//! The state machine is evaluated fresh on every call: `now` advances and
//! the invalidated flag can change out-of-band (logout from another
//! request), so liveness is never cached.

use crate::db::{Database, Session, unix_now_secs};

/// Liveness classification of one session at one instant.
///
/// Only `Live` admits a request; the other states are distinguished for
/// observability and tests, never for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Live,
    Invalidated,
    Expired,
    NotFound,
}

/// Classify a looked-up session at time `now`.
///
/// Invalidation wins over expiry, and expiry is strict: a session whose
/// `expires_at` equals `now` is already dead.
pub fn session_state(session: Option<&Session>, now: i64) -> SessionState {
    match session {
        None => SessionState::NotFound,
        Some(s) if s.invalidated => SessionState::Invalidated,
        Some(s) if s.expires_at <= now => SessionState::Expired,
        Some(_) => SessionState::Live,
    }
}

/// Authoritative liveness checks against the session store.
pub struct SessionValidator {
    db: Database,
}

impl SessionValidator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Look up and classify a session. Store faults are preserved here so
    /// the observability layer can tell them apart from confirmed
    /// non-liveness.
    pub async fn check(&self, session_id: &str) -> Result<SessionState, sqlx::Error> {
        let session = self.db.sessions().get(session_id).await?;
        Ok(session_state(session.as_ref(), unix_now_secs()))
    }

    /// True only for a live session. Every other state and every store
    /// fault maps to false: the auth check fails closed, never open.
    pub async fn is_live(&self, session_id: &str) -> bool {
        match self.check(session_id).await {
            Ok(SessionState::Live) => true,
            Ok(state) => {
                tracing::debug!(session_id = %session_id, state = ?state, "Session not live");
                false
            }
            Err(e) => {
                tracing::error!(
                    session_id = %session_id,
                    error = %e,
                    "Session lookup failed, treating as not live"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn session(invalidated: bool, expires_at: i64) -> Session {
        Session {
            id: "s-1".to_string(),
            user_id: 1,
            expires_at,
            invalidated,
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_liveness_truth_table() {
        let now = 1_000_000;

        // invalidated x expired, all four combinations
        assert_eq!(
            session_state(Some(&session(false, now + 60)), now),
            SessionState::Live
        );
        assert_eq!(
            session_state(Some(&session(false, now - 60)), now),
            SessionState::Expired
        );
        assert_eq!(
            session_state(Some(&session(true, now + 60)), now),
            SessionState::Invalidated
        );
        assert_eq!(
            session_state(Some(&session(true, now - 60)), now),
            SessionState::Invalidated
        );
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let now = 1_000_000;
        assert_eq!(
            session_state(Some(&session(false, now)), now),
            SessionState::Expired
        );
        assert_eq!(
            session_state(Some(&session(false, now + 1)), now),
            SessionState::Live
        );
    }

    #[test]
    fn test_missing_session_not_found() {
        assert_eq!(session_state(None, 0), SessionState::NotFound);
    }

    #[tokio::test]
    async fn test_is_live_fresh_session() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();
        let s = db.sessions().create(user_id, 900).await.unwrap();

        let validator = SessionValidator::new(db);
        assert!(validator.is_live(&s.id).await);
    }

    #[tokio::test]
    async fn test_is_live_false_after_invalidate() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();
        let s = db.sessions().create(user_id, 900).await.unwrap();
        db.sessions().invalidate(&s.id).await.unwrap();

        let validator = SessionValidator::new(db.clone());
        assert!(!validator.is_live(&s.id).await);
        assert_eq!(
            validator.check(&s.id).await.unwrap(),
            SessionState::Invalidated
        );
    }

    #[tokio::test]
    async fn test_is_live_false_for_missing() {
        let db = Database::open(":memory:").await.unwrap();

        let validator = SessionValidator::new(db);
        assert!(!validator.is_live("no-such-id").await);
    }

    #[tokio::test]
    async fn test_is_live_false_for_injected_expiry() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();
        let s = db.sessions().create(user_id, 900).await.unwrap();

        // Fast-forward: push the record's expiry into the past
        sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
            .bind(unix_now_secs() - 60)
            .bind(&s.id)
            .execute(db.pool())
            .await
            .unwrap();

        let validator = SessionValidator::new(db.clone());
        assert!(!validator.is_live(&s.id).await);
        assert_eq!(validator.check(&s.id).await.unwrap(), SessionState::Expired);
    }
}
