//! SQLite Store Implementation

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SeedUser, SessionStore, UserStore};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, password::PasswordDigest, password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// SQLite-backed user and session store
#[derive(Clone)]
pub struct SqliteAuthStore {
    pool: SqlitePool,
}

impl SqliteAuthStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist
    ///
    /// The unique index on normalized email is the authoritative arbiter
    /// for concurrent registrations.
    pub async fn init_schema(&self) -> AuthResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password_digest TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                user_email TEXT NOT NULL,
                expires_at_ms INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// User Store Implementation
// ============================================================================

impl UserStore for SqliteAuthStore {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_digest, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_digest, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn create(
        &self,
        email: &Email,
        name: &DisplayName,
        password: &RawPassword,
        pepper: Option<&[u8]>,
    ) -> AuthResult<User> {
        let password_digest = PasswordDigest::from_raw(password, pepper)?;
        let created_at = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, name, password_digest, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(email.as_str())
        .bind(name.as_str())
        .bind(password_digest.as_phc_string())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AuthError::DuplicateUser
            } else {
                AuthError::Database(e)
            }
        })?;

        Ok(User {
            id,
            email: email.clone(),
            name: name.clone(),
            password_digest,
            created_at,
        })
    }

    async fn delete_by_id(&self, id: i64) -> AuthResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn seed_defaults(&self, users: &[SeedUser], pepper: Option<&[u8]>) -> AuthResult<u64> {
        let mut created = 0u64;

        for entry in users {
            let email = Email::new(entry.email.as_str())?;
            if self.find_by_email(&email).await?.is_some() {
                continue;
            }

            let name = DisplayName::new(entry.name.as_str())?;
            // Seed passwords bypass the registration length policy
            let password = RawPassword::new(entry.password.as_str())?;

            match self.create(&email, &name, &password, pepper).await {
                Ok(_) => created += 1,
                // Lost a race against another seeding process; still idempotent
                Err(AuthError::DuplicateUser) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(created)
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for SqliteAuthStore {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, user_email, expires_at_ms, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id.to_string())
        .bind(session.user_id)
        .bind(session.user_email.as_str())
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, user_id, user_email, expires_at_ms, created_at
            FROM sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id.to_string())
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");
        }

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_digest: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: self.id,
            email: Email::from_db(self.email),
            name: DisplayName::from_db(self.name),
            password_digest: PasswordDigest::from_db(self.password_digest)?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: String,
    user_id: i64,
    user_email: String,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthResult<Session> {
        let session_id = self
            .session_id
            .parse()
            .map_err(|e| AuthError::Internal(format!("Invalid session_id: {}", e)))?;

        Ok(Session {
            session_id,
            user_id: self.user_id,
            user_email: Email::from_db(self.user_email),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        })
    }
}
