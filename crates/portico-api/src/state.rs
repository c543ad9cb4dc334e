//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use portico_auth::jwt::decoder::JwtDecoder;
use portico_auth::password::hasher::PasswordHasher;
use portico_auth::session::manager::SessionManager;
use portico_auth::store::{MembershipStore, TenantStore, UserStore};
use portico_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Session flow manager (login, refresh, switch-tenant, logout)
    pub session_manager: Arc<SessionManager>,

    // ── Stores ───────────────────────────────────────────────
    /// User store
    pub users: Arc<dyn UserStore>,
    /// Tenant store
    pub tenants: Arc<dyn TenantStore>,
    /// Membership store
    pub memberships: Arc<dyn MembershipStore>,
}
