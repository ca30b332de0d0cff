//! Current User Use Case
//!
//! Session-backed identity lookup, serving both the strict `/api/user`
//! endpoint and the non-failing `/api/check-auth` probe.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionStore, UserStore};
use crate::error::{AuthError, AuthResult};

/// Current user use case
pub struct CurrentUserUseCase<S>
where
    S: UserStore + SessionStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CurrentUserUseCase<S>
where
    S: UserStore + SessionStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Resolve the user behind a session token
    ///
    /// Returns `None` for every anonymous case: missing/forged token, no
    /// matching session, expired session. A session whose `user_id` no
    /// longer resolves (user deleted out of band) is deleted here and
    /// reported as `StaleSession`, which callers may fold into the
    /// anonymous case or surface with its own message.
    pub async fn execute(&self, session_token: Option<&str>) -> AuthResult<Option<User>> {
        let Some(token) = session_token else {
            return Ok(None);
        };

        let Ok(session_id) = session_token::verify(token, &self.config.session_secret) else {
            return Ok(None);
        };

        let Some(session) = self.store.find_session(session_id).await? else {
            return Ok(None);
        };

        // The store already filters expired rows; re-check in case an
        // implementation returns one anyway
        if session.is_expired() {
            return Ok(None);
        }

        match self.store.find_by_id(session.user_id).await? {
            Some(user) => Ok(Some(user)),
            None => {
                // Stale session: clear it so the credential stops resolving
                tracing::warn!(
                    session_id = %session_id,
                    user_id = session.user_id,
                    "Session references missing user; clearing session"
                );
                self.store.delete_session(session_id).await?;
                Err(AuthError::StaleSession)
            }
        }
    }
}
