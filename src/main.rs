//! Portico Server — Multi-Tenant Identity & Access Service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use portico_core::config::AppConfig;
use portico_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PORTICO_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Portico v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = portico_database::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    portico_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Repositories behind the store traits ─────────────
    let users: Arc<dyn portico_auth::store::UserStore> = Arc::new(
        portico_database::repositories::user::UserRepository::new(db.pool().clone()),
    );
    let tenants: Arc<dyn portico_auth::store::TenantStore> = Arc::new(
        portico_database::repositories::tenant::TenantRepository::new(db.pool().clone()),
    );
    let memberships: Arc<dyn portico_auth::store::MembershipStore> = Arc::new(
        portico_database::repositories::membership::MembershipRepository::new(db.pool().clone()),
    );
    let refresh_tokens: Arc<dyn portico_auth::store::RefreshTokenStore> = Arc::new(
        portico_database::repositories::refresh_token::RefreshTokenRepository::new(
            db.pool().clone(),
        ),
    );

    // ── Step 3: Auth system ──────────────────────────────────────
    tracing::info!("Initializing authentication system...");
    let password_hasher = portico_auth::password::PasswordHasher::new();
    let jwt_encoder = portico_auth::jwt::JwtEncoder::new(&config.auth)?;
    let jwt_decoder = Arc::new(portico_auth::jwt::JwtDecoder::new(&config.auth));
    let credentials =
        portico_auth::credentials::CredentialVerifier::new(users.clone(), password_hasher.clone())?;
    let refresh_service = portico_auth::refresh::RefreshTokenService::new(
        refresh_tokens,
        config.auth.refresh_token_ttl_days,
    );
    let session_manager = Arc::new(portico_auth::session::SessionManager::new(
        users.clone(),
        tenants.clone(),
        memberships.clone(),
        credentials,
        jwt_encoder,
        refresh_service,
    ));

    // ── Step 4: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = portico_api::AppState {
        config: Arc::new(config),
        jwt_decoder,
        password_hasher: Arc::new(password_hasher),
        session_manager,
        users,
        tenants,
        memberships,
    };

    let app = portico_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Portico server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    db.close().await;
    tracing::info!("Portico server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
