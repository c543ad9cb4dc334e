//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). No usable default;
    /// the process refuses to start when empty.
    #[serde(default)]
    pub jwt_secret: String,
    /// Issuer embedded in and required of every access token.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Audience embedded in and required of every access token.
    #[serde(default = "default_audience")]
    pub jwt_audience: String,
    /// Access token TTL in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_seconds: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Minimum password length for newly created accounts.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: default_issuer(),
            jwt_audience: default_audience(),
            access_token_ttl_seconds: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_issuer() -> String {
    "portico".to_string()
}

fn default_audience() -> String {
    "portico-api".to_string()
}

fn default_access_ttl() -> u64 {
    // 8 hours
    28_800
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}
