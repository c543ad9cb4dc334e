//! # portico-auth
//!
//! The authentication and tenant-scoped authorization core of Portico.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing and verification
//! - `credentials` — credential verification with dummy-hash timing defense
//! - `jwt` — access token creation and validation
//! - `refresh` — refresh token issuance, redemption, and rotation
//! - `session` — login / refresh / switch-tenant / logout flows
//! - `store` — persistence traits with Postgres and in-memory backends

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod session;
pub mod store;

pub use credentials::CredentialVerifier;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use refresh::RefreshTokenService;
pub use session::SessionManager;
pub use store::{MembershipStore, RefreshTokenStore, TenantStore, UserStore};
