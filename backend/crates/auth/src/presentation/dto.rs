//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Requests
// ============================================================================

/// Register request
///
/// Optional fields: missing-field validation belongs to the use case so the
/// client gets the `{success:false, message}` envelope with a 400, not a
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Public user view
// ============================================================================

/// Public projection of a user: the only user shape that leaves the service
///
/// Never carries the password digest.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// ISO-8601 timestamp
    pub created_at: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Register/login success response
#[derive(Debug, Clone, Serialize)]
pub struct AuthSuccessResponse {
    pub success: bool,
    pub user: UserView,
    pub message: String,
}

/// Logout response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/user success response
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserView,
    pub authenticated: bool,
}

/// GET /api/check-auth response (never a failure status)
#[derive(Debug, Clone, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}
