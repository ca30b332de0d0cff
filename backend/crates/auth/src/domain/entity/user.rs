//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, password::PasswordDigest,
};

/// Registered account
///
/// Created only via registration or the one-time seeding routine; never
/// updated or deleted by this service. The digest never leaves the backend;
/// the client-facing projection is `presentation::dto::UserView`.
#[derive(Debug, Clone)]
pub struct User {
    /// Monotonic identifier assigned by the database at insert
    pub id: i64,
    /// Normalized (lower-cased, trimmed) email, unique across all users
    pub email: Email,
    /// Display name
    pub name: DisplayName,
    /// One-way password digest
    pub password_digest: PasswordDigest,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}
