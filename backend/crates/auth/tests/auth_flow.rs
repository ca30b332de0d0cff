//! End-to-end flows over the real router with an in-memory SQLite store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use auth::application::SeedUsersUseCase;
use auth::domain::entity::{session::Session, user::User};
use auth::domain::repository::{SeedUser, SessionStore, UserStore};
use auth::domain::value_object::{
    display_name::DisplayName, email::Email, password::RawPassword,
};
use auth::error::{AuthError, AuthResult};
use auth::{
    AuthConfig, SqliteAuthStore, auth_router, auth_router_generic, default_seed_users,
};

/// Build an isolated app instance backed by a fresh in-memory database.
///
/// One pooled connection: every connection to `sqlite::memory:` is its own
/// database, so the pool must not open a second one.
async fn build_app() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    let store = SqliteAuthStore::new(pool.clone());
    store.init_schema().await.expect("schema");

    let config = AuthConfig::development();
    let app = Router::new().nest("/api", auth_router(store, config));

    (app, pool)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` pair from the Set-Cookie header, ready for a Cookie header
fn session_cookie(resp: &axum::response::Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn register(app: &Router, email: &str, password: &str, name: &str) -> axum::response::Response {
    app.clone()
        .oneshot(post_json(
            "/api/register",
            json!({"email": email, "password": password, "name": name}),
        ))
        .await
        .unwrap()
}

/// Store whose session writes always fail; user operations hit the real
/// database underneath.
#[derive(Clone)]
struct BrokenSessionStore {
    inner: SqliteAuthStore,
}

impl UserStore for BrokenSessionStore {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: i64) -> AuthResult<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn create(
        &self,
        email: &Email,
        name: &DisplayName,
        password: &RawPassword,
        pepper: Option<&[u8]>,
    ) -> AuthResult<User> {
        self.inner.create(email, name, password, pepper).await
    }

    async fn delete_by_id(&self, id: i64) -> AuthResult<()> {
        self.inner.delete_by_id(id).await
    }

    async fn seed_defaults(&self, users: &[SeedUser], pepper: Option<&[u8]>) -> AuthResult<u64> {
        self.inner.seed_defaults(users, pepper).await
    }
}

impl SessionStore for BrokenSessionStore {
    async fn create_session(&self, _session: &Session) -> AuthResult<()> {
        Err(AuthError::Internal("session insert refused".into()))
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        self.inner.find_session(session_id).await
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        self.inner.delete_session(session_id).await
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.inner.cleanup_expired().await
    }
}

// ============================================================================
// Register
// ============================================================================

#[tokio::test]
async fn register_succeeds_and_normalizes_email() {
    let (app, _pool) = build_app().await;

    let resp = register(&app, "A@B.com", "secret1", "Al").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = session_cookie(&resp);
    assert!(cookie.starts_with("auth_session="));

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Account created successfully"));
    assert_eq!(body["user"]["email"], json!("a@b.com"));
    assert_eq!(body["user"]["name"], json!("Al"));
    assert!(body["user"]["id"].is_i64());
    assert!(body["user"]["created_at"].is_string());
}

#[tokio::test]
async fn register_duplicate_email_any_variant_rejected() {
    let (app, _pool) = build_app().await;

    let resp = register(&app, "a@b.com", "secret1", "Al").await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Casing/whitespace variant of the same normalized email
    let resp = register(&app, "A@b.COM ", "secret2", "Bo").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("User already exists"));
}

#[tokio::test]
async fn register_missing_fields_rejected() {
    let (app, _pool) = build_app().await;

    for payload in [
        json!({}),
        json!({"email": "a@b.com", "password": "secret1"}),
        json!({"email": "a@b.com", "name": "Al"}),
        json!({"email": "", "password": "secret1", "name": "Al"}),
        json!({"email": "   ", "password": "secret1", "name": "Al"}),
    ] {
        let resp = app
            .clone()
            .oneshot(post_json("/api/register", payload.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {payload}");

        let body = body_json(resp).await;
        assert_eq!(body["message"], json!("Missing required fields"));
    }
}

#[tokio::test]
async fn register_empty_body_rejected() {
    let (app, _pool) = build_app().await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_field_validation() {
    let (app, _pool) = build_app().await;

    let resp = register(&app, "not-an-email", "secret1", "Al").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], json!("Invalid email format"));

    let resp = register(&app, "a@b.com", "12345", "Al").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["message"],
        json!("Password must be at least 6 characters long")
    );

    let resp = register(&app, "a@b.com", "secret1", "A").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["message"],
        json!("Name must be at least 2 characters long")
    );
}

#[tokio::test]
async fn failed_session_write_rolls_back_registration() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteAuthStore::new(pool.clone());
    store.init_schema().await.unwrap();

    let broken = Router::new().nest(
        "/api",
        auth_router_generic(
            BrokenSessionStore {
                inner: store.clone(),
            },
            AuthConfig::development(),
        ),
    );

    let resp = register(&broken, "a@b.com", "secret1", "Al").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Registration failed"));

    // The user insert was rolled back
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);

    // Retrying once the store recovers succeeds instead of hitting the
    // duplicate-email guard
    let healthy = Router::new().nest("/api", auth_router(store, AuthConfig::development()));
    let resp = register(&healthy, "a@b.com", "secret1", "Al").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_gets_error_envelope() {
    let (app, _pool) = build_app().await;

    for uri in ["/api/register", "/api/login"] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");

        let body = body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Invalid request body"));
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn login_with_correct_credentials() {
    let (app, _pool) = build_app().await;
    register(&app, "a@b.com", "secret1", "Al").await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            json!({"email": "A@B.COM", "password": "secret1"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).starts_with("auth_session="));

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Login successful"));
    assert_eq!(body["user"]["email"], json!("a@b.com"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, _pool) = build_app().await;
    register(&app, "a@b.com", "secret1", "Al").await;

    // Wrong password for an existing user
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            json!({"email": "a@b.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(resp).await;

    // Nonexistent email
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            json!({"email": "nobody@b.com", "password": "secret1"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = body_json(resp).await;

    // No email-enumeration signal
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["message"], json!("Invalid email or password"));
}

#[tokio::test]
async fn login_missing_fields_rejected() {
    let (app, _pool) = build_app().await;

    let resp = app
        .clone()
        .oneshot(post_json("/api/login", json!({"email": "a@b.com"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["message"],
        json!("Missing email or password")
    );
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn register_login_logout_lifecycle() {
    let (app, _pool) = build_app().await;

    let resp = register(&app, "a@b.com", "secret1", "Al").await;
    let cookie = session_cookie(&resp);
    let registered = body_json(resp).await;

    // Authenticated after register
    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/user", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["authenticated"], json!(true));
    assert_eq!(body["user"]["id"], registered["user"]["id"]);
    assert_eq!(body["user"]["email"], json!("a@b.com"));

    // Logout clears the session server-side
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Logged out successfully"));

    // The old token still carries a valid signature but no session remains
    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/user", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let (app, _pool) = build_app().await;

    // No session at all
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["success"], json!(true));
}

#[tokio::test]
async fn current_user_without_session() {
    let (app, _pool) = build_app().await;

    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/user", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Not authenticated"));
}

#[tokio::test]
async fn current_user_with_forged_cookie() {
    let (app, _pool) = build_app().await;

    let resp = app
        .clone()
        .oneshot(get_with_cookie(
            "/api/user",
            Some("auth_session=not-a-real-token"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stale_session_is_cleared() {
    let (app, pool) = build_app().await;

    let resp = register(&app, "a@b.com", "secret1", "Al").await;
    let cookie = session_cookie(&resp);

    // Delete the user out of band; the session row now dangles
    sqlx::query("DELETE FROM users WHERE email = 'a@b.com'")
        .execute(&pool)
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/user", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], json!("User not found"));

    // The dangling session was deleted, not just ignored
    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 0);
}

#[tokio::test]
async fn expired_session_is_treated_as_absent() {
    let (app, pool) = build_app().await;

    let resp = register(&app, "a@b.com", "secret1", "Al").await;
    let cookie = session_cookie(&resp);

    sqlx::query("UPDATE sessions SET expires_at_ms = 0")
        .execute(&pool)
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/user", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Check auth
// ============================================================================

#[tokio::test]
async fn check_auth_never_fails() {
    let (app, _pool) = build_app().await;

    // Anonymous
    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/check-auth", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body, json!({"authenticated": false}));

    // Garbage cookie still answers 200
    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/check-auth", Some("auth_session=junk")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["authenticated"], json!(false));
}

#[tokio::test]
async fn check_auth_reflects_session_state() {
    let (app, _pool) = build_app().await;

    let resp = register(&app, "a@b.com", "secret1", "Al").await;
    let cookie = session_cookie(&resp);

    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/check-auth", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["authenticated"], json!(true));
    assert_eq!(body["user"]["email"], json!("a@b.com"));

    // Logout, then the probe reports anonymous
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(get_with_cookie("/api/check-auth", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"authenticated": false}));
}

// ============================================================================
// Seeding
// ============================================================================

#[tokio::test]
async fn seeding_is_idempotent() {
    let (app, pool) = build_app().await;

    let store = Arc::new(SqliteAuthStore::new(pool));
    let config = Arc::new(AuthConfig::development());
    let seeder = SeedUsersUseCase::new(store, config);

    assert_eq!(seeder.execute(&default_seed_users()).await.unwrap(), 3);
    // Re-running creates nothing
    assert_eq!(seeder.execute(&default_seed_users()).await.unwrap(), 0);

    // Seeded credentials log in, including the one below the registration
    // minimum length
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            json!({"email": "chef@cookify.com", "password": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["user"]["name"], json!("Chef Demo"));
}

// ============================================================================
// Public user view
// ============================================================================

#[tokio::test]
async fn public_view_never_contains_digest() {
    let (app, _pool) = build_app().await;

    let resp = register(&app, "a@b.com", "secret1", "Al").await;
    let cookie = session_cookie(&resp);
    let body = body_json(resp).await;

    let keys: Vec<&str> = body["user"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 4);
    for key in ["id", "email", "name", "created_at"] {
        assert!(keys.contains(&key));
    }

    // Same projection everywhere a user is returned
    for uri in ["/api/user", "/api/check-auth"] {
        let resp = app
            .clone()
            .oneshot(get_with_cookie(uri, Some(&cookie)))
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert!(body["user"].get("password_digest").is_none());
        assert!(body["user"].get("password").is_none());
    }
}
