//! `AuthUser` extractor — pulls the access token from the Authorization
//! header or the `auth_token` cookie, validates it, and injects the
//! principal.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use portico_core::error::AppError;
use portico_entity::membership::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal attached to a request.
///
/// Carries exactly what the verified access token claims carried;
/// lifetime is one request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The active tenant the token is scoped to.
    pub tenant_id: Uuid,
    /// User email.
    pub email: String,
    /// Role held in the active tenant.
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Bearer header first, then the auth cookie. Failures are
        // uniform: callers never learn which check rejected them.
        let bearer = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get("auth_token")
                .map(|c| c.value().to_string())
                .ok_or_else(|| ApiError::from(AppError::unauthenticated("Authentication required")))?,
        };

        let claims = state.jwt_decoder.verify(&token)?;

        Ok(AuthUser {
            user_id: claims.sub,
            tenant_id: claims.tenant_id,
            email: claims.email,
            role: claims.role,
        })
    }
}
