//! In-memory store implementations using Tokio mutexes.
//!
//! Suitable for tests and single-node demos; not for production use.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use portico_core::error::AppError;
use portico_core::result::AppResult;
use portico_entity::membership::{NewTenantMembership, TenantMembership};
use portico_entity::tenant::Tenant;
use portico_entity::token::{NewRefreshToken, RefreshToken};
use portico_entity::user::{NewUser, User};

use super::{MembershipStore, RefreshTokenStore, TenantStore, UserStore};

/// In-memory user store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    state: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.state.lock().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.state.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        let mut users = self.state.lock().await;
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict("Email already in use"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// In-memory tenant store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTenantStore {
    state: Arc<Mutex<Vec<Tenant>>>,
}

impl MemoryTenantStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tenant and returns it.
    pub async fn add(&self, name: &str) -> Tenant {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.push(tenant.clone());
        tenant
    }
}

#[async_trait]
impl TenantStore for MemoryTenantStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        let tenants = self.state.lock().await;
        Ok(tenants.iter().find(|t| t.id == id).cloned())
    }
}

/// In-memory membership store.
///
/// Listing sorts by `(created_at, id)`, the same composite key the
/// Postgres queries order by, so "first membership" is deterministic
/// across backends.
#[derive(Debug, Clone, Default)]
pub struct MemoryMembershipStore {
    state: Arc<Mutex<Vec<TenantMembership>>>,
}

impl MemoryMembershipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TenantMembership>> {
        let memberships = self.state.lock().await;
        let mut result: Vec<TenantMembership> = memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| (m.created_at, m.id));
        Ok(result)
    }

    async fn find_for_user_tenant(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> AppResult<Option<TenantMembership>> {
        let memberships = self.state.lock().await;
        Ok(memberships
            .iter()
            .find(|m| m.user_id == user_id && m.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<TenantMembership>> {
        let memberships = self.state.lock().await;
        let mut result: Vec<TenantMembership> = memberships
            .iter()
            .filter(|m| m.tenant_id == tenant_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| (m.created_at, m.id));
        Ok(result)
    }

    async fn create(&self, data: &NewTenantMembership) -> AppResult<TenantMembership> {
        let mut memberships = self.state.lock().await;
        if memberships
            .iter()
            .any(|m| m.user_id == data.user_id && m.tenant_id == data.tenant_id)
        {
            return Err(AppError::conflict("User is already a member of this tenant"));
        }
        let membership = TenantMembership {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            tenant_id: data.tenant_id,
            role: data.role,
            created_at: Utc::now(),
        };
        memberships.push(membership.clone());
        Ok(membership)
    }
}

/// In-memory refresh token store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenStore {
    state: Arc<Mutex<Vec<RefreshToken>>>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored token records (all users).
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    /// Whether the store holds no token records.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        let mut tokens = self.state.lock().await;
        let token = RefreshToken {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            token_hash: data.token_hash.clone(),
            expires_at: data.expires_at,
            created_at: Utc::now(),
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        let tokens = self.state.lock().await;
        Ok(tokens.iter().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn delete_by_hash(&self, token_hash: &str) -> AppResult<bool> {
        let mut tokens = self.state.lock().await;
        let before = tokens.len();
        tokens.retain(|t| t.token_hash != token_hash);
        Ok(tokens.len() < before)
    }

    async fn delete_expired_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let now = Utc::now();
        let mut tokens = self.state.lock().await;
        let before = tokens.len();
        tokens.retain(|t| t.user_id != user_id || t.expires_at >= now);
        Ok((before - tokens.len()) as u64)
    }
}
