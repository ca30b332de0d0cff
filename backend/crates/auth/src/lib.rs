//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, store traits
//! - `application/` - Use cases and configuration
//! - `infra/` - SQLite store implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration, login, logout, session-backed identity lookup
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Idempotent demo-account seeding
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Unknown email and wrong password are indistinguishable on login
//! - The password digest never appears in a response

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::seed::default_seed_users;
pub use error::{AuthError, AuthResult};
pub use infra::sqlite::SqliteAuthStore;
pub use presentation::router::{auth_router, auth_router_generic};
