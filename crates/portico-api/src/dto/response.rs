//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Login email.
    pub email: String,
}

/// A tenant membership presented to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantGrantResponse {
    /// Tenant ID.
    pub tenant_id: Uuid,
    /// Tenant display name.
    pub name: String,
    /// Role held within the tenant.
    pub role: String,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub token: String,
    /// Raw refresh token (surfaced exactly once).
    pub refresh_token: String,
    /// The authenticated user.
    pub user: UserSummary,
    /// All tenant memberships, active one first.
    pub tenants: Vec<TenantGrantResponse>,
}

/// Refresh response: the rotated token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub token: String,
    /// New raw refresh token.
    pub refresh_token: String,
}

/// Tenant switch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchTenantResponse {
    /// Access token scoped to the target tenant.
    pub token: String,
    /// The tenant switched to.
    pub tenant_id: Uuid,
    /// Role held in the target tenant.
    pub role: String,
}

/// Current principal, as read from the verified access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// User ID.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Active tenant.
    pub tenant_id: Uuid,
    /// Role in the active tenant.
    pub role: String,
}

/// A member of a tenant, for admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUserResponse {
    /// User ID.
    pub user_id: Uuid,
    /// Login email.
    pub email: String,
    /// Role within the tenant.
    pub role: String,
    /// When the membership was granted.
    pub joined_at: DateTime<Utc>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Server version.
    pub version: String,
}
