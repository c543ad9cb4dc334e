//! Refresh token repository implementation.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use portico_core::error::{AppError, ErrorKind};
use portico_core::result::AppResult;
use portico_entity::token::{NewRefreshToken, RefreshToken};

/// Repository for the refresh token table.
///
/// The table is the only mutable shared resource of the auth core.
/// `delete_by_hash` reports whether a row was actually removed; rotation
/// uses that as the serialization point between concurrent redeemers.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a newly issued token record.
    pub async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create refresh token", e)
        })
    }

    /// Look up a token record by its hash.
    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Delete a token record by its hash. Returns `true` if a row was
    /// removed; `false` means another request already consumed it.
    pub async fn delete_by_hash(&self, token_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete refresh token", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all expired token records for a user. Returns the number
    /// of rows removed.
    pub async fn delete_expired_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND expires_at < $2")
                .bind(user_id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to purge expired refresh tokens",
                        e,
                    )
                })?;

        Ok(result.rows_affected())
    }
}
