//! Authentication handlers: login, refresh, tenant switch, me, logout.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;
use validator::Validate;

use portico_core::error::AppError;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, SwitchTenantRequest};
use crate::error::ApiError;
use crate::dto::response::{
    ApiResponse, LoginResponse, MeResponse, MessageResponse, RefreshResponse,
    SwitchTenantResponse, TenantGrantResponse, UserSummary,
};
use crate::extractors::AuthUser;
use crate::state::AppState;

const AUTH_COOKIE: &str = "auth_token";
const REFRESH_COOKIE: &str = "refresh_token";

fn session_cookie(state: &AppState, name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(state.config.server.secure_cookies)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    req.validate()
        .map_err(|_| AppError::validation("email and password are required"))?;

    let session = state.session_manager.login(&req.email, &req.password).await?;

    let jar = jar
        .add(session_cookie(
            &state,
            AUTH_COOKIE,
            session.tokens.access_token.clone(),
        ))
        .add(session_cookie(
            &state,
            REFRESH_COOKIE,
            session.tokens.refresh_token.clone(),
        ));

    let tenants = session
        .tenants
        .iter()
        .map(|g| TenantGrantResponse {
            tenant_id: g.tenant_id,
            name: g.tenant_name.clone(),
            role: g.role.to_string(),
        })
        .collect();

    let body = LoginResponse {
        token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
        user: UserSummary {
            id: session.user.id,
            email: session.user.email,
        },
        tenants,
    };

    Ok((jar, Json(ApiResponse::ok(body))))
}

/// `POST /api/auth/refresh`
///
/// The raw refresh token is taken from the JSON body when present,
/// falling back to the `refresh_token` cookie.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, Json<ApiResponse<RefreshResponse>>), ApiError> {
    let raw = body
        .and_then(|Json(req)| req.refresh_token)
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .unwrap_or_default();

    let session = state.session_manager.refresh(&raw).await?;

    let jar = jar
        .add(session_cookie(
            &state,
            AUTH_COOKIE,
            session.tokens.access_token.clone(),
        ))
        .add(session_cookie(
            &state,
            REFRESH_COOKIE,
            session.tokens.refresh_token.clone(),
        ));

    let body = RefreshResponse {
        token: session.tokens.access_token,
        refresh_token: session.tokens.refresh_token,
    };

    Ok((jar, Json(ApiResponse::ok(body))))
}

/// `POST /api/auth/switch-tenant`
pub async fn switch_tenant(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    Json(req): Json<SwitchTenantRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SwitchTenantResponse>>), ApiError> {
    let tenant_id = Uuid::parse_str(&req.tenant_id)
        .map_err(|_| AppError::validation("Invalid tenant id"))?;

    let switch = state
        .session_manager
        .switch_tenant(auth.user_id, &auth.email, tenant_id)
        .await?;

    let jar = jar.add(session_cookie(&state, AUTH_COOKIE, switch.access_token.clone()));

    let body = SwitchTenantResponse {
        token: switch.access_token,
        tenant_id: switch.tenant_id,
        role: switch.role.to_string(),
    };

    Ok((jar, Json(ApiResponse::ok(body))))
}

/// `GET /api/auth/me`
pub async fn me(auth: AuthUser) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::ok(MeResponse {
        id: auth.user_id,
        email: auth.email,
        tenant_id: auth.tenant_id,
        role: auth.role.to_string(),
    }))
}

/// `POST /api/auth/logout`
///
/// Revokes the refresh token if one is presented and clears the
/// session cookies. Always succeeds.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<LogoutRequest>>,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let raw = body
        .and_then(|Json(req)| req.refresh_token)
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()));

    state.session_manager.logout(raw.as_deref()).await;

    // Always emit the clearing cookies, even when the request carried
    // the token in the body rather than a cookie.
    let jar = jar
        .add(removal_cookie(AUTH_COOKIE))
        .add(removal_cookie(REFRESH_COOKIE));

    (
        jar,
        Json(ApiResponse::ok(MessageResponse {
            message: "Logged out".to_string(),
        })),
    )
}
