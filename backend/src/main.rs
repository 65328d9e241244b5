//! Help-desk entry-point: loads configuration, prepares storage and serves
//! the HTTP API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use helpdesk::inbound::http::health::HealthState;
use helpdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppConfig, BuildMode, ServerConfig, create_server, session_settings};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::load().wrap_err("load configuration")?;
    let session = session_settings(&config, BuildMode::from_debug_assertions())
        .wrap_err("session configuration")?;

    let mut server_config = ServerConfig::new(session, config.bind_addr()).with_storage(&config);

    if let Some(database_url) = config.database_url.clone() {
        let pool = prepare_database(database_url, &config).await?;
        server_config = server_config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), server_config)
        .await
        .wrap_err("start server")?;
    info!(addr = %config.bind_addr(), "help-desk server listening");

    let draining = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            draining.mark_draining();
            info!("shutdown requested, readiness withdrawn");
        }
    });

    server.await.wrap_err("server terminated")?;
    info!(drained = health_state.is_draining(), "help-desk server stopped");
    Ok(())
}

async fn prepare_database(database_url: String, config: &AppConfig) -> Result<DbPool> {
    let migrations_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migrations_url))
        .await
        .map_err(|err| eyre!("migration task failed: {err}"))?
        .wrap_err("apply migrations")?;
    info!(applied, "database migrations applied");

    let pool_config = PoolConfig::new(database_url)
        .with_max_size(config.db_pool_size())
        .with_query_timeout(config.store_timeout());
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("create database pool")?;
    info!(connections = pool.open_connections(), "database pool ready");
    Ok(pool)
}
