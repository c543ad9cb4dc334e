//! Credential verification with dummy-hash timing defense.

use std::sync::Arc;

use tracing::warn;

use portico_core::error::AppError;
use portico_core::result::AppResult;
use portico_entity::user::User;

use crate::password::PasswordHasher;
use crate::store::UserStore;

/// Verifies submitted credentials against the user store.
///
/// The verifier holds a precomputed dummy hash. When the email does not
/// resolve to a user, the submitted password is verified against the
/// dummy hash anyway, so "unknown email" and "wrong password" cost the
/// same and surface as the same error.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    dummy_hash: String,
}

impl CredentialVerifier {
    /// Creates a verifier, precomputing the dummy hash once.
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> AppResult<Self> {
        let dummy_hash = hasher.hash_password("portico-timing-defense-dummy")?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    /// Verify an email/password pair.
    ///
    /// Empty input is a validation error, not an auth failure. Unknown
    /// email and wrong password both collapse to the same
    /// `Unauthenticated` outcome after a full hash comparison.
    pub async fn verify(&self, email: &str, password: &str) -> AppResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }

        let user = self.users.find_by_email(email).await?;

        // Never short-circuit on a missing user.
        let stored_hash = match &user {
            Some(u) => u.password_hash.as_str(),
            None => self.dummy_hash.as_str(),
        };
        let password_valid = self.hasher.verify_password(password, stored_hash)?;

        match user {
            Some(u) if password_valid => Ok(u),
            _ => {
                warn!(email = %email, "Login attempt rejected");
                Err(AppError::unauthenticated("Invalid email or password"))
            }
        }
    }
}
