//! Tally API Server
//!
//! Main entry point for the Tally budgeting service.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, CookieSettings, create_router};
use tally_core::clock::SystemClock;
use tally_db::migration::Migrator;
use tally_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let storage = if config.database.is_in_memory() {
        info!("Using in-memory storage; data is lost on exit");
        tally_db::memory_storage()
    } else {
        let db = tally_db::connect(&config.database).await?;
        info!("Connected to database");
        if config.database.run_migrations {
            Migrator::up(&db, None).await?;
            info!("Migrations applied");
        }
        tally_db::postgres_storage(&db)
    };

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("jwt.access_token_expiry_secs is too large")?,
        refresh_token_expires_secs: i64::try_from(config.jwt.refresh_token_expiry_secs)
            .context("jwt.refresh_token_expiry_secs is too large")?,
    };

    let state = AppState {
        storage,
        jwt_service: Arc::new(JwtService::new(jwt_config)),
        clock: Arc::new(SystemClock),
        cookies: CookieSettings {
            domain: config.jwt.cookie_domain.clone(),
            secure: config.jwt.secure_cookies,
        },
        started_at: Instant::now(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
