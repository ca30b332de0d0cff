//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionStore, UserStore};
use crate::infra::sqlite::SqliteAuthStore;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router with the SQLite store
pub fn auth_router(store: SqliteAuthStore, config: AuthConfig) -> Router {
    auth_router_generic(store, config)
}

/// Create an auth router for any store implementation
pub fn auth_router_generic<S>(store: S, config: AuthConfig) -> Router
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .route("/logout", post(handlers::logout::<S>))
        .route("/user", get(handlers::current_user::<S>))
        .route("/check-auth", get(handlers::check_auth::<S>))
        .with_state(state)
}
