//! `fieldseal-svc`: field encryption service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing + optional OTLP).
//! 3. Resolve the key material. A required key that is missing or a
//!    placeholder stops the process here.
//! 4. Build the cipher engine and field cipher.
//! 5. Build the Axum router and start the HTTP server.

mod config;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use fieldseal::{CipherEngine, FieldCipher, KeyMaterial};
use tracing::{info, warn};

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        app_env = %cfg.app_env,
        listen_port = cfg.listen_port,
        "fieldseal-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Key material
    // -----------------------------------------------------------------------
    let resolved = KeyMaterial::resolve(&cfg.key_config()).context("encryption key rejected")?;
    let key_source = resolved.source;
    if resolved.is_insecure_default() {
        warn!("running on the development default key; health will report degraded");
    }

    // -----------------------------------------------------------------------
    // 4. Cipher
    // -----------------------------------------------------------------------
    let engine = CipherEngine::new(Arc::new(resolved.material), cfg.algorithm()?)
        .context("failed to initialise cipher engine")?;
    info!(
        algorithm = %engine.algorithm(),
        key_fingerprint = %engine.key_fingerprint(),
        key_source = %key_source,
        "cipher ready"
    );

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(FieldCipher::new(engine), key_source);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fieldseal-svc stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
