//! Session flows over the credential verifier, token services, and stores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use portico_core::error::AppError;
use portico_core::result::AppResult;
use portico_entity::membership::{Role, TenantMembership};
use portico_entity::user::User;

use crate::credentials::CredentialVerifier;
use crate::jwt::JwtEncoder;
use crate::refresh::RefreshTokenService;
use crate::store::{MembershipStore, TenantStore, UserStore};

/// A membership presented to the client: tenant, display name, role.
#[derive(Debug, Clone)]
pub struct TenantGrant {
    /// The tenant granted access to.
    pub tenant_id: Uuid,
    /// Tenant display name.
    pub tenant_name: String,
    /// Role held within the tenant.
    pub role: Role,
}

/// The credential pair produced by login and refresh.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// Signed access token.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Raw refresh token, surfaced to the client exactly once.
    pub refresh_token: String,
    /// Refresh token expiry.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// The authenticated user.
    pub user: User,
    /// The active tenant selected for this session.
    pub active: TenantGrant,
    /// All of the user's memberships, active one first.
    pub tenants: Vec<TenantGrant>,
    /// Issued token pair.
    pub tokens: SessionTokens,
}

/// Result of a successful tenant switch.
#[derive(Debug, Clone)]
pub struct TenantSwitch {
    /// Access token scoped to the target tenant.
    pub access_token: String,
    /// Access token expiry.
    pub expires_at: DateTime<Utc>,
    /// The tenant switched to.
    pub tenant_id: Uuid,
    /// Role held in the target tenant.
    pub role: Role,
}

/// Drives the login / refresh / switch-tenant / logout flows.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    tenants: Arc<dyn TenantStore>,
    memberships: Arc<dyn MembershipStore>,
    credentials: CredentialVerifier,
    encoder: JwtEncoder,
    refresh_tokens: RefreshTokenService,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        users: Arc<dyn UserStore>,
        tenants: Arc<dyn TenantStore>,
        memberships: Arc<dyn MembershipStore>,
        credentials: CredentialVerifier,
        encoder: JwtEncoder,
        refresh_tokens: RefreshTokenService,
    ) -> Self {
        Self {
            users,
            tenants,
            memberships,
            credentials,
            encoder,
            refresh_tokens,
        }
    }

    /// Authenticate with email and password and open a session.
    ///
    /// A user with zero memberships cannot authenticate even with
    /// correct credentials; the failure is the same uniform
    /// `Unauthenticated` class as a credential mismatch.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedSession> {
        // 1. Verify credentials (timing-safe for unknown emails).
        let user = self.credentials.verify(email, password).await?;

        // 2. Resolve memberships; the first is the active tenant.
        let memberships = self.memberships.list_for_user(user.id).await?;
        let Some(first) = memberships.first() else {
            warn!(user_id = %user.id, "Login rejected: no tenant memberships");
            return Err(AppError::unauthenticated("No tenant memberships found"));
        };

        // 3. Issue the token pair scoped to the active tenant.
        let access = self
            .encoder
            .issue(user.id, first.tenant_id, &user.email, first.role)?;
        let refresh = self.refresh_tokens.issue(user.id).await?;

        let tenants = self.resolve_grants(&memberships).await?;
        let active = tenants[0].clone();

        info!(user_id = %user.id, tenant_id = %active.tenant_id, "User logged in");

        Ok(AuthenticatedSession {
            user,
            active,
            tenants,
            tokens: SessionTokens {
                access_token: access.token,
                access_expires_at: access.expires_at,
                refresh_token: refresh.raw,
                refresh_expires_at: refresh.expires_at,
            },
        })
    }

    /// Redeem a refresh token and rotate the session.
    ///
    /// The old token row is consumed before the replacement is issued.
    /// The active membership is re-resolved, so a role change since the
    /// original login is reflected in the new access token.
    pub async fn refresh(&self, raw_refresh_token: &str) -> AppResult<AuthenticatedSession> {
        if raw_refresh_token.trim().is_empty() {
            return Err(AppError::unauthenticated("Missing refresh token"));
        }

        // 1. Consume the presented token (single-use).
        let user_id = self.refresh_tokens.redeem(raw_refresh_token).await?;

        // 2. The user must still exist.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid refresh token"))?;

        // 3. Re-resolve the active membership.
        let memberships = self.memberships.list_for_user(user.id).await?;
        let Some(first) = memberships.first() else {
            return Err(AppError::unauthenticated("No tenant memberships found"));
        };

        // 4. Issue the replacement pair.
        let access = self
            .encoder
            .issue(user.id, first.tenant_id, &user.email, first.role)?;
        let refresh = self.refresh_tokens.issue(user.id).await?;

        let tenants = self.resolve_grants(&memberships).await?;
        let active = tenants[0].clone();

        info!(user_id = %user.id, "Session refreshed");

        Ok(AuthenticatedSession {
            user,
            active,
            tenants,
            tokens: SessionTokens {
                access_token: access.token,
                access_expires_at: access.expires_at,
                refresh_token: refresh.raw,
                refresh_expires_at: refresh.expires_at,
            },
        })
    }

    /// Mint a new access token scoped to another tenant the user is a
    /// member of. The refresh token is untouched: switching tenants
    /// neither extends nor rotates the session's refresh lifetime.
    pub async fn switch_tenant(
        &self,
        user_id: Uuid,
        email: &str,
        target_tenant_id: Uuid,
    ) -> AppResult<TenantSwitch> {
        let membership = self
            .memberships
            .find_for_user_tenant(user_id, target_tenant_id)
            .await?
            .ok_or_else(|| AppError::forbidden("No membership for requested tenant"))?;

        let access = self
            .encoder
            .issue(user_id, membership.tenant_id, email, membership.role)?;

        info!(user_id = %user_id, tenant_id = %target_tenant_id, "Switched active tenant");

        Ok(TenantSwitch {
            access_token: access.token,
            expires_at: access.expires_at,
            tenant_id: membership.tenant_id,
            role: membership.role,
        })
    }

    /// Best-effort logout: revoke the presented refresh token and purge
    /// the owner's expired tokens. Never fails, even when the token is
    /// absent, unknown, or already rotated away.
    pub async fn logout(&self, raw_refresh_token: Option<&str>) {
        let Some(raw) = raw_refresh_token.filter(|r| !r.trim().is_empty()) else {
            return;
        };

        match self.refresh_tokens.revoke(raw).await {
            Ok(Some(user_id)) => {
                if let Err(e) = self.refresh_tokens.purge_expired(user_id).await {
                    warn!(error = %e, "Failed to purge expired refresh tokens on logout");
                }
                info!(user_id = %user_id, "User logged out");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to revoke refresh token on logout"),
        }
    }

    /// Attach tenant display names to raw membership rows.
    async fn resolve_grants(
        &self,
        memberships: &[TenantMembership],
    ) -> AppResult<Vec<TenantGrant>> {
        let mut grants = Vec::with_capacity(memberships.len());
        for membership in memberships {
            // The tenant row should exist (FK); fall back to the id.
            let tenant_name = self
                .tenants
                .find_by_id(membership.tenant_id)
                .await?
                .map(|t| t.name)
                .unwrap_or_else(|| membership.tenant_id.to_string());
            grants.push(TenantGrant {
                tenant_id: membership.tenant_id,
                tenant_name,
                role: membership.role,
            });
        }
        Ok(grants)
    }
}
