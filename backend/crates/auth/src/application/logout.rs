//! Logout Use Case
//!
//! Clears session state. Idempotent: succeeds regardless of prior auth state.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Delete the session behind the token, if it parses
    ///
    /// An invalid or forged token is not an error here; the caller clears
    /// the cookie either way.
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let Ok(session_id) = session_token::verify(session_token, &self.config.session_secret)
        else {
            return Ok(());
        };

        self.store.delete_session(session_id).await?;

        tracing::info!(session_id = %session_id, "User logged out");
        Ok(())
    }
}
