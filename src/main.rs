//! ChargeFinder REST API server.
//! Reads configuration from TOML file (~/.config/chargefinder/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use chargefinder::application::scheduling::{AvailabilityEngine, ReservationService};
use chargefinder::application::services::{StationService, UserService};
use chargefinder::auth::jwt::JwtConfig;
use chargefinder::config::AppConfig;
use chargefinder::domain::{RepositoryProvider, UserRole};
use chargefinder::infrastructure::database::migrator::Migrator;
use chargefinder::shared::ShutdownCoordinator;
use chargefinder::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("CHARGEFINDER_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting ChargeFinder API server...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "chargefinder".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let engine = Arc::new(AvailabilityEngine::new(repos.clone()));
    let reservation_service = Arc::new(ReservationService::new(repos.clone(), engine));
    let station_service = Arc::new(StationService::new(repos.clone()));
    let user_service = Arc::new(UserService::new(repos.clone()));

    // Create default admin user if no users exist
    create_default_admin(&user_service, repos.as_ref(), &app_cfg).await;

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        station_service,
        reservation_service,
        user_service,
        db.clone(),
        jwt_config,
        prometheus_handle,
    );

    let api_addr = app_cfg.server_address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let serve_shutdown = shutdown_signal.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            serve_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // ── Final cleanup ──────────────────────────────────────────
    info!("Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("ChargeFinder shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(
    user_service: &UserService,
    repos: &dyn RepositoryProvider,
    app_cfg: &AppConfig,
) {
    let users_count = repos.users().count().await.unwrap_or(0);
    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");
    match user_service
        .register_with_role(
            &app_cfg.admin.username,
            &app_cfg.admin.email,
            &app_cfg.admin.password,
            UserRole::Admin,
        )
        .await
    {
        Ok(admin) => {
            info!("Default admin created: {}", admin.email);
            info!("Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}
