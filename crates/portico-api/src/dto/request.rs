//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "email and password are required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "email and password are required"))]
    pub password: String,
}

/// Token refresh request body. The raw token may come from the
/// `refresh_token` cookie instead; the body is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Raw refresh token.
    pub refresh_token: Option<String>,
}

/// Tenant switch request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchTenantRequest {
    /// Target tenant id, as a string so that an unparsable value is a
    /// validation error rather than a body rejection.
    pub tenant_id: String,
}

/// Logout request body; the token may also come from the cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Raw refresh token.
    pub refresh_token: Option<String>,
}

/// Create user request (tenant admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Login email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Initial password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Role in the admin's active tenant: ADMIN or VIEWER.
    pub role: String,
}
