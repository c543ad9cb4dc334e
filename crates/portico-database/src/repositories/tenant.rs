//! Tenant repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use portico_core::error::{AppError, ErrorKind};
use portico_core::result::AppResult;
use portico_entity::tenant::Tenant;

/// Repository for tenant lookup.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new tenant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tenant by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find tenant by id", e)
            })
    }
}
