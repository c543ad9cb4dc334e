//! Session lifecycle flows: login, refresh, switch-tenant, logout.

pub mod manager;

pub use manager::{AuthenticatedSession, SessionManager, SessionTokens, TenantGrant, TenantSwitch};
