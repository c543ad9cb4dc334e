//! Refresh token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored refresh token.
///
/// Only the SHA-256 hash of the raw token is persisted; the raw value is
/// handed to the client exactly once at issuance. Rows are single-use:
/// redemption deletes the row before a replacement is issued.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique token record identifier.
    pub id: Uuid,
    /// The user the token belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the raw token value, unique.
    pub token_hash: String,
    /// When the token stops being redeemable.
    pub expires_at: DateTime<Utc>,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Check whether the token is past its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Data required to persist a newly issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRefreshToken {
    /// The user the token belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the raw token value.
    pub token_hash: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}
