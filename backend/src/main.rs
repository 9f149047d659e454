//! PropertyHub entry-point: loads settings, prepares the database and serves
//! the REST API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use propertyhub::domain::ports::FederatedIdentityVerifier;
use propertyhub::inbound::http::health::HealthState;
use propertyhub::inbound::http::session_config::{BuildMode, key_fingerprint, session_settings};
use propertyhub::outbound::identity::JwtIdentityVerifier;
use propertyhub::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use propertyhub::settings::{AppSettings, FederatedIdentitySettings};

use server::{ServerConfig, create_server};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn identity_verifier(
    settings: &FederatedIdentitySettings,
) -> io::Result<Arc<dyn FederatedIdentityVerifier>> {
    let pem = std::fs::read(&settings.key_file)?;
    let verifier = JwtIdentityVerifier::from_rsa_pem(&pem, &settings.issuer, &settings.audience)
        .map_err(io::Error::other)?;
    info!(issuer = %settings.issuer, "federated login enabled");
    Ok(Arc::new(verifier))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let database_url = settings.database_url().map_err(io::Error::other)?.to_owned();
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let pool_size = settings.db_pool_size().map_err(io::Error::other)?;
    let otp_ttl = settings.otp_ttl().map_err(io::Error::other)?;
    let federated = settings.federated_identity().map_err(io::Error::other)?;

    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    if settings.run_migrations() {
        run_pending_migrations(&database_url)
            .await
            .map_err(io::Error::other)?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(pool_size))
        .await
        .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        pool,
    )
    .with_otp_ttl(otp_ttl);
    match federated {
        Some(identity) => config = config.with_identity_verifier(identity_verifier(&identity)?),
        None => warn!("no identity provider configured; federated login is disabled"),
    }

    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
