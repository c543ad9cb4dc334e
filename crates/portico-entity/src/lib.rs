//! # portico-entity
//!
//! Domain entity models for Portico. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod membership;
pub mod tenant;
pub mod token;
pub mod user;
