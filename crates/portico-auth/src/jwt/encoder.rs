//! Access token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use portico_core::config::AuthConfig;
use portico_core::error::AppError;
use portico_entity::membership::Role;

use super::claims::Claims;

/// Creates signed JWT access tokens.
///
/// Construction fails when no signing secret is configured; the server
/// refuses to start rather than issuing unverifiable tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer claim value.
    issuer: String,
    /// Audience claim value.
    audience: String,
    /// Access token TTL in seconds.
    access_ttl_seconds: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .finish()
    }
}

/// A freshly signed access token with its expiry instant.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedAccessToken {
    /// The signed, compact-encoded token.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "JWT signing secret is not configured",
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            access_ttl_seconds: config.access_token_ttl_seconds as i64,
        })
    }

    /// Signs an access token scoped to the given tenant and role.
    pub fn issue(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<IssuedAccessToken, AppError> {
        self.issue_with_ttl(user_id, tenant_id, email, role, self.access_ttl_seconds)
    }

    /// Signs an access token with an explicit TTL in seconds.
    pub fn issue_with_ttl(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        role: Role,
        ttl_seconds: i64,
    ) -> Result<IssuedAccessToken, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(ttl_seconds);

        let claims = Claims {
            sub: user_id,
            tenant_id,
            email: email.to_string(),
            role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedAccessToken { token, expires_at })
    }
}
