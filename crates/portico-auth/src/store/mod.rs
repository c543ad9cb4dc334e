//! Persistence traits the auth core depends on.
//!
//! The flows in this crate never talk to a concrete database; they go
//! through these narrow traits. `postgres` implements them on top of the
//! `portico-database` repositories; `memory` provides Tokio-mutex backed
//! implementations for tests and single-node demos.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use portico_core::result::AppResult;
use portico_entity::membership::{NewTenantMembership, TenantMembership};
use portico_entity::tenant::Tenant;
use portico_entity::token::{NewRefreshToken, RefreshToken};
use portico_entity::user::{NewUser, User};

/// User lookup and creation.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create a new user; duplicate email yields a conflict error.
    async fn create(&self, data: &NewUser) -> AppResult<User>;
}

/// Tenant lookup.
#[async_trait]
pub trait TenantStore: Send + Sync + 'static {
    /// Find a tenant by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>>;
}

/// Tenant membership queries.
#[async_trait]
pub trait MembershipStore: Send + Sync + 'static {
    /// List a user's memberships, deterministically ordered oldest first.
    /// The first entry is the active tenant selected at login.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TenantMembership>>;

    /// Find a user's membership in a specific tenant.
    async fn find_for_user_tenant(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> AppResult<Option<TenantMembership>>;

    /// List all memberships of a tenant, oldest first.
    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<TenantMembership>>;

    /// Grant a membership; duplicate (user, tenant) yields a conflict.
    async fn create(&self, data: &NewTenantMembership) -> AppResult<TenantMembership>;
}

/// Refresh token persistence.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a newly issued token record.
    async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken>;

    /// Look up a token record by its hash.
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>>;

    /// Delete a token record by its hash. Returns `true` if a row was
    /// removed. This is the serialization point between concurrent
    /// redeemers of the same raw token: exactly one caller sees `true`.
    async fn delete_by_hash(&self, token_hash: &str) -> AppResult<bool>;

    /// Delete all expired token records for a user. Returns the number
    /// of rows removed.
    async fn delete_expired_for_user(&self, user_id: Uuid) -> AppResult<u64>;
}
