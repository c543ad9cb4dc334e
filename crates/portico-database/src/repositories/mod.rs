//! Repository implementations for all Portico entities.

pub mod membership;
pub mod refresh_token;
pub mod tenant;
pub mod user;

pub use membership::MembershipRepository;
pub use refresh_token::RefreshTokenRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;
