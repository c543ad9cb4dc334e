//! Refresh token lifecycle: issue, redeem (single-use), revoke, purge.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use portico_core::error::AppError;
use portico_core::result::AppResult;
use portico_entity::token::NewRefreshToken;

use crate::store::RefreshTokenStore;

/// Entropy of a raw refresh token in bytes.
const RAW_TOKEN_BYTES: usize = 32;

/// A freshly issued refresh token.
///
/// The raw value exists only here and in the response to the client; it
/// is never stored or logged.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    /// The raw token value, handed to the client exactly once.
    pub raw: String,
    /// Expiration timestamp of the stored record.
    pub expires_at: DateTime<Utc>,
}

/// Issues and redeems refresh tokens against the backing store.
///
/// Every stored token is single-use: `redeem` deletes the row before
/// reporting success, and the delete doubles as the serialization point
/// when two requests present the same raw token concurrently.
#[derive(Clone)]
pub struct RefreshTokenService {
    store: Arc<dyn RefreshTokenStore>,
    ttl_days: i64,
}

impl RefreshTokenService {
    /// Creates a new service over the given store.
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl_days: u64) -> Self {
        Self {
            store,
            ttl_days: ttl_days as i64,
        }
    }

    /// Computes the storage hash of a raw token value.
    pub fn hash_raw(raw: &str) -> String {
        hex::encode(Sha256::digest(raw.as_bytes()))
    }

    /// Generates a fresh raw token value (256 bits of entropy, hex).
    fn generate_raw() -> String {
        let mut bytes = [0u8; RAW_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Issues a new refresh token for a user, persisting only its hash.
    pub async fn issue(&self, user_id: Uuid) -> AppResult<IssuedRefreshToken> {
        let raw = Self::generate_raw();
        let expires_at = Utc::now() + chrono::Duration::days(self.ttl_days);

        self.store
            .create(&NewRefreshToken {
                user_id,
                token_hash: Self::hash_raw(&raw),
                expires_at,
            })
            .await?;

        debug!(user_id = %user_id, "Issued refresh token");
        Ok(IssuedRefreshToken { raw, expires_at })
    }

    /// Redeems a raw refresh token, consuming it.
    ///
    /// On success the stored row is already deleted and the owning user
    /// id is returned; the caller is expected to issue a replacement.
    /// Expired rows are purged on detection. A concurrent redeemer of
    /// the same raw value loses the delete race and fails.
    pub async fn redeem(&self, raw: &str) -> AppResult<Uuid> {
        let hash = Self::hash_raw(raw);

        let record = self
            .store
            .find_by_hash(&hash)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid refresh token"))?;

        if record.is_expired(Utc::now()) {
            self.store.delete_by_hash(&hash).await?;
            return Err(AppError::unauthenticated("Refresh token expired"));
        }

        // Delete before reissue. A crash here leaves zero valid tokens
        // for this session, never two.
        let deleted = self.store.delete_by_hash(&hash).await?;
        if !deleted {
            debug!(user_id = %record.user_id, "Refresh token already consumed");
            return Err(AppError::unauthenticated("Invalid refresh token"));
        }

        Ok(record.user_id)
    }

    /// Deletes a presented raw token if it exists, returning the owning
    /// user id when a record was found. Used by logout.
    pub async fn revoke(&self, raw: &str) -> AppResult<Option<Uuid>> {
        let hash = Self::hash_raw(raw);
        let owner = self.store.find_by_hash(&hash).await?.map(|r| r.user_id);
        self.store.delete_by_hash(&hash).await?;
        Ok(owner)
    }

    /// Purges all expired token records for a user.
    pub async fn purge_expired(&self, user_id: Uuid) -> AppResult<u64> {
        let purged = self.store.delete_expired_for_user(user_id).await?;
        if purged > 0 {
            info!(user_id = %user_id, purged, "Purged expired refresh tokens");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_core::error::ErrorKind;

    use crate::store::memory::MemoryRefreshTokenStore;

    fn service(store: &MemoryRefreshTokenStore) -> RefreshTokenService {
        RefreshTokenService::new(Arc::new(store.clone()), 7)
    }

    #[tokio::test]
    async fn test_issue_stores_only_the_hash() {
        let store = MemoryRefreshTokenStore::new();
        let svc = service(&store);
        let user_id = Uuid::new_v4();

        let issued = svc.issue(user_id).await.unwrap();

        let record = store
            .find_by_hash(&RefreshTokenService::hash_raw(&issued.raw))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.user_id, user_id);
        assert_ne!(record.token_hash, issued.raw);
    }

    #[tokio::test]
    async fn test_redeem_is_single_use() {
        let store = MemoryRefreshTokenStore::new();
        let svc = service(&store);
        let user_id = Uuid::new_v4();

        let issued = svc.issue(user_id).await.unwrap();

        assert_eq!(svc.redeem(&issued.raw).await.unwrap(), user_id);

        let err = svc.redeem(&issued.raw).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let store = MemoryRefreshTokenStore::new();
        let svc = service(&store);

        let err = svc.redeem("no-such-token").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_expired_token_is_purged_on_detection() {
        let store = MemoryRefreshTokenStore::new();
        let svc = service(&store);
        let user_id = Uuid::new_v4();

        let raw = "expired-raw-token";
        store
            .create(&NewRefreshToken {
                user_id,
                token_hash: RefreshTokenService::hash_raw(raw),
                expires_at: Utc::now() - chrono::Duration::hours(1),
            })
            .await
            .unwrap();

        let err = svc.redeem(raw).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        // Eagerly deleted, not waiting for a sweep.
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired_leaves_live_tokens() {
        let store = MemoryRefreshTokenStore::new();
        let svc = service(&store);
        let user_id = Uuid::new_v4();

        store
            .create(&NewRefreshToken {
                user_id,
                token_hash: RefreshTokenService::hash_raw("old"),
                expires_at: Utc::now() - chrono::Duration::days(1),
            })
            .await
            .unwrap();
        let live = svc.issue(user_id).await.unwrap();

        assert_eq!(svc.purge_expired(user_id).await.unwrap(), 1);
        assert_eq!(svc.redeem(&live.raw).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = MemoryRefreshTokenStore::new();
        let svc = service(&store);
        let user_id = Uuid::new_v4();

        let issued = svc.issue(user_id).await.unwrap();

        assert_eq!(svc.revoke(&issued.raw).await.unwrap(), Some(user_id));
        assert_eq!(svc.revoke(&issued.raw).await.unwrap(), None);
    }
}
