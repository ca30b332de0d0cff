//! Login Use Case
//!
//! Authenticates a user and creates a session. Unknown email and wrong
//! password are indistinguishable to the caller.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionStore, UserStore};
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    /// Signed session token for the cookie
    pub session_token: String,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: UserStore + SessionStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LoginUseCase<S>
where
    S: UserStore + SessionStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let (email, password) = match (&input.email, &input.password) {
            (Some(e), Some(p)) if !e.trim().is_empty() && !p.trim().is_empty() => (e, p),
            _ => return Err(AuthError::Validation("Missing email or password".into())),
        };

        // A malformed email cannot match a stored (validated) one; fold it
        // into the same credential failure to avoid an enumeration signal
        let email = Email::new(email.as_str()).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            RawPassword::new(password.as_str()).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password_digest.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::new(
            user.id,
            user.email.clone(),
            self.config.session_ttl_chrono(),
        );
        self.store.create_session(&session).await?;

        let session_token = session_token::sign(session.session_id, &self.config.session_secret);

        tracing::info!(
            user_id = user.id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            user,
            session_token,
        })
    }
}
