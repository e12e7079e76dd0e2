//! Session record storage.
//!
//! A session is one server-tracked login. Records are mutated exactly once
//! (invalidation) and never deleted; retention is an external concern.

use sqlx::sqlite::SqlitePool;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A server-side session record.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    /// Unix timestamp after which the session is dead regardless of the
    /// invalidated flag.
    pub expires_at: i64,
    /// Set to true at logout, never reset.
    pub invalidated: bool,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: String,
    user_id: i64,
    expires_at: i64,
    invalidated: i32,
    created_at: String,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            expires_at: row.expires_at,
            invalidated: row.invalidated != 0,
            created_at: row.created_at,
        }
    }
}

/// Current Unix time in seconds.
pub fn unix_now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Store for managing session records.
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new session expiring `ttl_secs` from now. The single
    /// INSERT is atomic; no caller can observe a half-created session.
    pub async fn create(&self, user_id: i64, ttl_secs: u64) -> Result<Session, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let expires_at = unix_now_secs() + ttl_secs as i64;

        sqlx::query(
            "INSERT INTO sessions (id, user_id, expires_at, invalidated) VALUES (?, ?, ?, 0)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        let session = self.get(&id).await?;
        // The row was just inserted on this pool; a miss here is a store fault.
        session.ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a session by ID.
    pub async fn get(&self, id: &str) -> Result<Option<Session>, sqlx::Error> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, user_id, expires_at, invalidated, created_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Session::from))
    }

    /// Invalidate a session: set `invalidated` and pull `expires_at` back
    /// to now. Idempotent, and silent when the id is unknown — logout must
    /// not fail a user-visible request because the session is already gone.
    pub async fn invalidate(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessions SET invalidated = 1, expires_at = ? WHERE id = ?")
            .bind(unix_now_secs())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[tokio::test]
    async fn test_create_session() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();

        let session = db.sessions().create(user_id, 900).await.unwrap();

        assert_eq!(session.user_id, user_id);
        assert!(!session.invalidated);
        assert!(session.expires_at > unix_now_secs());

        let fetched = db.sessions().get(&session.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_sessions_have_distinct_ids() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();

        let s1 = db.sessions().create(user_id, 900).await.unwrap();
        let s2 = db.sessions().create(user_id, 900).await.unwrap();

        assert_ne!(s1.id, s2.id);
    }

    #[tokio::test]
    async fn test_get_missing_session() {
        let db = Database::open(":memory:").await.unwrap();

        assert!(db.sessions().get("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_session() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();
        let session = db.sessions().create(user_id, 900).await.unwrap();

        db.sessions().invalidate(&session.id).await.unwrap();

        let fetched = db.sessions().get(&session.id).await.unwrap().unwrap();
        assert!(fetched.invalidated);
        assert!(fetched.expires_at <= unix_now_secs());
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let db = Database::open(":memory:").await.unwrap();
        let user_id = db
            .users()
            .create("uuid-1", "a@x.com", "$argon2id$fake", None, None)
            .await
            .unwrap();
        let session = db.sessions().create(user_id, 900).await.unwrap();

        db.sessions().invalidate(&session.id).await.unwrap();
        db.sessions().invalidate(&session.id).await.unwrap();

        let fetched = db.sessions().get(&session.id).await.unwrap().unwrap();
        assert!(fetched.invalidated);
    }

    #[tokio::test]
    async fn test_invalidate_unknown_id_succeeds_silently() {
        let db = Database::open(":memory:").await.unwrap();

        assert!(db.sessions().invalidate("no-such-id").await.is_ok());
    }
}
