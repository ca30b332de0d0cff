//! Seed Users Use Case
//!
//! Explicit, idempotent bootstrap for demo accounts. Invoked once by the
//! binary at startup, never as a side effect of constructing the service.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{SeedUser, UserStore};
use crate::error::AuthResult;

/// Default demo accounts
pub fn default_seed_users() -> Vec<SeedUser> {
    vec![
        SeedUser::new("admin@cookify.com", "Admin User", "admin123"),
        SeedUser::new("user@example.com", "Demo User", "password"),
        SeedUser::new("chef@cookify.com", "Chef Demo", "hello"),
    ]
}

/// Seed users use case
pub struct SeedUsersUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SeedUsersUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Create each entry only if its email is absent; re-running is a no-op
    pub async fn execute(&self, users: &[SeedUser]) -> AuthResult<u64> {
        let created = self
            .store
            .seed_defaults(users, self.config.pepper())
            .await?;

        if created > 0 {
            tracing::info!(users_created = created, "Seeded demo users");
        }

        Ok(created)
    }
}
