//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, password::RawPassword,
};
use crate::error::AuthResult;

/// Seed entry for the one-time demo-account bootstrap
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl SeedUser {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
        }
    }
}

/// User store trait
///
/// Owns the persisted `User` records. `create` computes the password digest
/// via the hashing capability and must surface a storage-level uniqueness
/// violation as `AuthError::DuplicateUser` (the authoritative arbiter for
/// concurrent registrations with the same email).
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// Exact match on normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>>;

    /// Create a user, assigning id and creation timestamp
    async fn create(
        &self,
        email: &Email,
        name: &DisplayName,
        password: &RawPassword,
        pepper: Option<&[u8]>,
    ) -> AuthResult<User>;

    /// Delete a user by id; deleting a missing user is not an error
    ///
    /// Used to undo a registration whose session write failed, so a retry
    /// does not hit the duplicate-email guard.
    async fn delete_by_id(&self, id: i64) -> AuthResult<()>;

    /// Idempotent bootstrap: create each entry only if absent
    ///
    /// Returns the number of users actually created. Not part of the
    /// request-serving contract.
    async fn seed_defaults(&self, users: &[SeedUser], pepper: Option<&[u8]>) -> AuthResult<u64>;
}

/// Session store trait
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Create a new session
    async fn create_session(&self, session: &Session) -> AuthResult<()>;

    /// Find a live (unexpired) session by ID
    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Delete a session; deleting a missing session is not an error
    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
