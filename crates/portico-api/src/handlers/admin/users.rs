//! User management within the admin's active tenant.

use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use validator::Validate;

use portico_core::error::AppError;
use portico_entity::membership::{NewTenantMembership, Role};
use portico_entity::user::NewUser;

use crate::dto::request::CreateUserRequest;
use crate::dto::response::{ApiResponse, TenantUserResponse, UserSummary};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// `GET /api/admin/users`
///
/// Lists the members of the caller's active tenant.
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TenantUserResponse>>>, ApiError> {
    require_admin(&auth)?;

    let memberships = state.memberships.list_for_tenant(auth.tenant_id).await?;

    let mut members = Vec::with_capacity(memberships.len());
    for membership in memberships {
        let user = state
            .users
            .find_by_id(membership.user_id)
            .await?
            .ok_or_else(|| AppError::internal("Membership references missing user"))?;
        members.push(TenantUserResponse {
            user_id: user.id,
            email: user.email,
            role: membership.role.to_string(),
            joined_at: membership.created_at,
        });
    }

    Ok(Json(ApiResponse::ok(members)))
}

/// `POST /api/admin/users`
///
/// Creates a user and grants them a membership in the caller's active
/// tenant.
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    require_admin(&auth)?;

    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let role = Role::from_str(&req.role)?;

    let password_hash = state.password_hasher.hash_password(&req.password)?;
    let user = state
        .users
        .create(&NewUser {
            email: req.email.to_lowercase(),
            password_hash,
        })
        .await?;

    state
        .memberships
        .create(&NewTenantMembership {
            user_id: user.id,
            tenant_id: auth.tenant_id,
            role,
        })
        .await?;

    Ok(Json(ApiResponse::ok(UserSummary {
        id: user.id,
        email: user.email,
    })))
}
