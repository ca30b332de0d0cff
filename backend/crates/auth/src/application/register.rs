//! Register Use Case
//!
//! Creates a new account and establishes an authenticated session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionStore, UserStore};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Register input
///
/// Fields are optional so that absent and present-but-empty JSON fields take
/// the same validation path instead of an extractor rejection.
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub user: User,
    /// Signed session token for the cookie
    pub session_token: String,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: UserStore + SessionStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RegisterUseCase<S>
where
    S: UserStore + SessionStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // All three fields must be present and non-empty after trimming
        let (email, password, name) = match (&input.email, &input.password, &input.name) {
            (Some(e), Some(p), Some(n))
                if !e.trim().is_empty() && !p.trim().is_empty() && !n.trim().is_empty() =>
            {
                (e, p, n)
            }
            _ => return Err(AuthError::Validation("Missing required fields".into())),
        };

        let email = Email::new(email.as_str())?;
        let password = RawPassword::for_registration(password.as_str())?;
        let name = DisplayName::new(name.as_str())?;

        // Pre-check for a friendlier duplicate error; the database uniqueness
        // constraint remains the authoritative arbiter under concurrency
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        let user = self
            .store
            .create(&email, &name, &password, self.config.pepper())
            .await
            .map_err(|e| match e {
                // Concurrent register with the same email lost the race;
                // indistinguishable from the pre-check path
                AuthError::DuplicateUser => AuthError::DuplicateUser,
                AuthError::Validation(msg) => AuthError::Validation(msg),
                other => {
                    tracing::error!(error = %other, "User insert failed");
                    AuthError::RegistrationFailed
                }
            })?;

        let session = Session::new(
            user.id,
            user.email.clone(),
            self.config.session_ttl_chrono(),
        );
        if let Err(e) = self.store.create_session(&session).await {
            tracing::error!(
                error = %e,
                user_id = user.id,
                "Session insert failed; rolling back user insert"
            );
            // Remove the just-created user so "Registration failed" means
            // nothing persisted and a retry is not met with DuplicateUser
            if let Err(rollback) = self.store.delete_by_id(user.id).await {
                tracing::error!(
                    error = %rollback,
                    user_id = user.id,
                    "Rollback of user insert failed"
                );
            }
            return Err(AuthError::RegistrationFailed);
        }

        let session_token = session_token::sign(session.session_id, &self.config.session_secret);

        tracing::info!(
            user_id = user.id,
            email = %user.email,
            "User registered"
        );

        Ok(RegisterOutput {
            user,
            session_token,
        })
    }
}
