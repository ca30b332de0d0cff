//! HTTP Handlers
//!
//! Thin request/response glue: extract the session cookie, run the use case,
//! shape the envelope, set or clear the cookie.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;

use platform::cookie::CookieConfig;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::{SessionStore, UserStore};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthSuccessResponse, CheckAuthResponse, CurrentUserResponse, LoginRequest, MessageResponse,
    RegisterRequest, UserView,
};

/// Shared state for auth handlers
///
/// Stores are injected per instance; tests construct isolated states.
#[derive(Clone)]
pub struct AuthAppState<S>
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/register
pub async fn register<S>(
    State(state): State<AuthAppState<S>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let req = parse_body(payload)?;

    let use_case = RegisterUseCase::new(state.store.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;

    let cookie = session_cookie(&state.config).build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthSuccessResponse {
            success: true,
            user: UserView::from(&output.user),
            message: "Account created successfully".to_string(),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/login
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let req = parse_body(payload)?;

    let use_case = LoginUseCase::new(state.store.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&state.config).build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthSuccessResponse {
            success: true,
            user: UserView::from(&output.user),
            message: "Login successful".to_string(),
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/logout
///
/// Always succeeds; the cookie is cleared whether or not a session existed.
pub async fn logout<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    if let Some(token) =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name)
    {
        let use_case = LogoutUseCase::new(state.store.clone(), state.config.clone());
        // Ignore errors - just clear the cookie
        let _ = use_case.execute(&token).await;
    }

    let cookie = session_cookie(&state.config).build_clear_cookie();

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    )
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/user
pub async fn current_user<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
) -> AuthResult<axum::response::Response>
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CurrentUserUseCase::new(state.store.clone(), state.config.clone());

    match use_case.execute(token.as_deref()).await {
        Ok(Some(user)) => Ok(Json(CurrentUserResponse {
            success: true,
            user: UserView::from(&user),
            authenticated: true,
        })
        .into_response()),
        Ok(None) => Ok(unauthenticated(&state.config, "Not authenticated")),
        // Session row deleted by the use case; clear the credential too
        Err(e @ AuthError::StaleSession) => {
            Ok(unauthenticated(&state.config, &e.public_message()))
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Check Auth
// ============================================================================

/// GET /api/check-auth
///
/// Non-failing probe: always 200, even when the store misbehaves.
pub async fn check_auth<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
) -> Json<CheckAuthResponse>
where
    S: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CurrentUserUseCase::new(state.store.clone(), state.config.clone());

    let user = match use_case.execute(token.as_deref()).await {
        Ok(user) => user,
        // The use case already logged and cleared the stale session
        Err(AuthError::StaleSession) => None,
        Err(e) => {
            tracing::warn!(error = %e, "check-auth lookup failed; reporting unauthenticated");
            None
        }
    };

    match user {
        Some(user) => Json(CheckAuthResponse {
            authenticated: true,
            user: Some(UserView::from(&user)),
        }),
        None => Json(CheckAuthResponse {
            authenticated: false,
            user: None,
        }),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Recover the request body without leaking extractor rejections
///
/// An absent body takes the same missing-fields path as an empty object; a
/// body that fails to parse still gets the standard `{success, message}`
/// envelope instead of the extractor's plain-text rejection.
fn parse_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(_) => Err(AuthError::Validation("Invalid request body".into())),
    }
}

/// 401 envelope that also clears the session cookie
fn unauthenticated(config: &AuthConfig, message: &str) -> axum::response::Response {
    let cookie = session_cookie(config).build_clear_cookie();
    (
        StatusCode::UNAUTHORIZED,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": false,
            "message": message,
        })),
    )
        .into_response()
}

fn session_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}
