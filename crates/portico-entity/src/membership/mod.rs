//! Tenant membership domain entities.

pub mod model;
pub mod role;

pub use model::{NewTenantMembership, TenantMembership};
pub use role::Role;
