//! Session Entity
//!
//! Server-side association between a request credential (signed cookie) and
//! a user identity. Cleared on logout, when the referenced user no longer
//! exists, or by expiry.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::email::Email;

/// Authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4); the cookie carries its HMAC-signed form
    pub session_id: Uuid,
    /// Reference to the user, may go stale if the user is deleted out of band
    pub user_id: i64,
    /// Email at session creation
    pub user_email: Email,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: i64, user_email: Email, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            user_email,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_not_expired() {
        let email = Email::from_db("a@b.com");
        let session = Session::new(1, email, Duration::hours(12));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_session() {
        let email = Email::from_db("a@b.com");
        let mut session = Session::new(1, email, Duration::hours(12));
        session.expires_at_ms = Utc::now().timestamp_millis() - 1000;
        assert!(session.is_expired());
    }
}
