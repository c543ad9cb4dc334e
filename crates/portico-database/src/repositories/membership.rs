//! Tenant membership repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use portico_core::error::{AppError, ErrorKind};
use portico_core::result::AppResult;
use portico_entity::membership::{NewTenantMembership, TenantMembership};

/// Repository for tenant membership queries.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's memberships.
    ///
    /// Ordered by (created_at, id) ascending so that "first membership"
    /// is deterministic; login relies on this to pick the active tenant.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TenantMembership>> {
        sqlx::query_as::<_, TenantMembership>(
            "SELECT * FROM tenant_memberships WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list memberships", e)
        })
    }

    /// Find the membership of a user in a specific tenant, if any.
    pub async fn find_for_user_tenant(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> AppResult<Option<TenantMembership>> {
        sqlx::query_as::<_, TenantMembership>(
            "SELECT * FROM tenant_memberships WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find membership", e)
        })
    }

    /// List all memberships of a tenant, oldest first.
    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<TenantMembership>> {
        sqlx::query_as::<_, TenantMembership>(
            "SELECT * FROM tenant_memberships WHERE tenant_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list tenant members", e)
        })
    }

    /// Grant a membership.
    pub async fn create(&self, data: &NewTenantMembership) -> AppResult<TenantMembership> {
        sqlx::query_as::<_, TenantMembership>(
            "INSERT INTO tenant_memberships (user_id, tenant_id, role) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.tenant_id)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("tenant_memberships_user_id_tenant_id_key") =>
            {
                AppError::conflict("User is already a member of this tenant".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create membership", e),
        })
    }
}
