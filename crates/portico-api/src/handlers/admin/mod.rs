//! Tenant administration handlers.

pub mod users;
