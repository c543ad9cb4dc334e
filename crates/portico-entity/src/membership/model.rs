//! Tenant membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;

/// A user's membership in a tenant, with the role held there.
///
/// One row per (user, tenant) pair; the pair is unique. A user may hold
/// different roles in different tenants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenantMembership {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The member user.
    pub user_id: Uuid,
    /// The tenant the user belongs to.
    pub tenant_id: Uuid,
    /// Role held within this tenant.
    pub role: Role,
    /// When the membership was granted.
    pub created_at: DateTime<Utc>,
}

/// Data required to grant a new membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenantMembership {
    /// The member user.
    pub user_id: Uuid,
    /// The tenant to join.
    pub tenant_id: Uuid,
    /// Role to hold within the tenant.
    pub role: Role,
}
