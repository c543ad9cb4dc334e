//! Refresh token issuance, redemption, and rotation.

pub mod service;

pub use service::{IssuedRefreshToken, RefreshTokenService};
