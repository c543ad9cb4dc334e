//! RBAC helpers for role-based route guarding.
//!
//! These are precondition checks invoked at the top of privileged
//! handlers, not filters over results.

use portico_core::error::AppError;
use portico_entity::membership::Role;

use crate::extractors::AuthUser;

/// Checks that the principal holds the given role in the active tenant.
pub fn require_role(auth: &AuthUser, role: Role) -> Result<(), AppError> {
    if auth.role != role {
        return Err(AppError::forbidden(format!(
            "{} role required",
            role.as_str()
        )));
    }
    Ok(())
}

/// Checks that the principal is an admin of the active tenant.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    require_role(auth, Role::Admin)
}
