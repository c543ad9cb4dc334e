//! Store trait implementations backed by the Postgres repositories.

use async_trait::async_trait;
use uuid::Uuid;

use portico_core::result::AppResult;
use portico_database::repositories::{
    MembershipRepository, RefreshTokenRepository, TenantRepository, UserRepository,
};
use portico_entity::membership::{NewTenantMembership, TenantMembership};
use portico_entity::tenant::Tenant;
use portico_entity::token::{NewRefreshToken, RefreshToken};
use portico_entity::user::{NewUser, User};

use super::{MembershipStore, RefreshTokenStore, TenantStore, UserStore};

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(self, email).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(self, id).await
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        UserRepository::create(self, data).await
    }
}

#[async_trait]
impl TenantStore for TenantRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        TenantRepository::find_by_id(self, id).await
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TenantMembership>> {
        MembershipRepository::list_for_user(self, user_id).await
    }

    async fn find_for_user_tenant(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> AppResult<Option<TenantMembership>> {
        MembershipRepository::find_for_user_tenant(self, user_id, tenant_id).await
    }

    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<TenantMembership>> {
        MembershipRepository::list_for_tenant(self, tenant_id).await
    }

    async fn create(&self, data: &NewTenantMembership) -> AppResult<TenantMembership> {
        MembershipRepository::create(self, data).await
    }
}

#[async_trait]
impl RefreshTokenStore for RefreshTokenRepository {
    async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        RefreshTokenRepository::create(self, data).await
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        RefreshTokenRepository::find_by_hash(self, token_hash).await
    }

    async fn delete_by_hash(&self, token_hash: &str) -> AppResult<bool> {
        RefreshTokenRepository::delete_by_hash(self, token_hash).await
    }

    async fn delete_expired_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        RefreshTokenRepository::delete_expired_for_user(self, user_id).await
    }
}
