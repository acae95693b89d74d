//! Backend entry-point: loads settings, opens the ledger database, and serves
//! the REST API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use utang::inbound::http::health::HealthState;
use utang::inbound::http::session_config::{BuildMode, session_settings_from_env};
use utang::outbound::persistence::{DbPool, PoolConfig};
use utang::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let pool_size = settings.pool_size().map_err(std::io::Error::other)?;
    let operator = settings.operator_account().map_err(std::io::Error::other)?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %session.key_fingerprint(),
        "session signing key loaded"
    );

    let database_path = settings.database_path();
    let pool_config =
        PoolConfig::new(database_path.to_string_lossy()).with_max_size(pool_size);
    let pool = tokio::task::spawn_blocking(move || DbPool::new(pool_config))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(path = %database_path.display(), "ledger database ready");

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        pool,
    )
    .with_operator(operator)
    .with_store_name(settings.store_name());

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting utang server");
    create_server(health_state, config)?.await
}
