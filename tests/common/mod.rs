//! Shared harness for integration tests: a fully wired application
//! over in-memory stores, driven through the router without a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use portico_api::{AppState, build_router};
use portico_auth::credentials::CredentialVerifier;
use portico_auth::jwt::{JwtDecoder, JwtEncoder};
use portico_auth::password::PasswordHasher;
use portico_auth::refresh::RefreshTokenService;
use portico_auth::session::SessionManager;
use portico_auth::store::memory::{
    MemoryMembershipStore, MemoryRefreshTokenStore, MemoryTenantStore, MemoryUserStore,
};
use portico_auth::store::{MembershipStore, UserStore};
use portico_core::config::app::ServerConfig;
use portico_core::config::auth::AuthConfig;
use portico_core::config::logging::LoggingConfig;
use portico_core::config::{AppConfig, DatabaseConfig};
use portico_entity::membership::{NewTenantMembership, Role};
use portico_entity::tenant::Tenant;
use portico_entity::user::{NewUser, User};

const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub tenants: Arc<MemoryTenantStore>,
    pub memberships: Arc<MemoryMembershipStore>,
    hasher: PasswordHasher,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookies: Vec<String>,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            ..AuthConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

pub async fn spawn_app() -> TestApp {
    let config = test_config();

    let users = Arc::new(MemoryUserStore::new());
    let tenants = Arc::new(MemoryTenantStore::new());
    let memberships = Arc::new(MemoryMembershipStore::new());
    let refresh_store = Arc::new(MemoryRefreshTokenStore::new());

    let hasher = PasswordHasher::new();
    let credentials = CredentialVerifier::new(users.clone(), hasher.clone()).unwrap();
    let session_manager = SessionManager::new(
        users.clone(),
        tenants.clone(),
        memberships.clone(),
        credentials,
        JwtEncoder::new(&config.auth).unwrap(),
        RefreshTokenService::new(refresh_store, config.auth.refresh_token_ttl_days),
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
        password_hasher: Arc::new(hasher.clone()),
        session_manager: Arc::new(session_manager),
        users: users.clone(),
        tenants: tenants.clone(),
        memberships: memberships.clone(),
    };

    TestApp {
        router: build_router(state),
        users,
        tenants,
        memberships,
        hasher,
    }
}

impl TestApp {
    pub async fn create_user(&self, email: &str, password: &str) -> User {
        self.users
            .create(&NewUser {
                email: email.to_string(),
                password_hash: self.hasher.hash_password(password).unwrap(),
            })
            .await
            .unwrap()
    }

    pub async fn add_tenant(&self, name: &str) -> Tenant {
        self.tenants.add(name).await
    }

    pub async fn grant(&self, user: &User, tenant: &Tenant, role: Role) {
        self.memberships
            .create(&NewTenantMembership {
                user_id: user.id,
                tenant_id: tenant.id,
                role,
            })
            .await
            .unwrap();
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(String::from))
            .collect();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        let prefix = format!("{name}=");
        self.set_cookies.iter().any(|c| c.starts_with(&prefix))
    }
}
