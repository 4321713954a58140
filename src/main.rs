//! HTTP server for the leave ledger.
//!
//! Reads settings from the environment (and `.env`), loads the leave policy
//! and employee roster, and serves the API over in-memory stores.

use std::process::ExitCode;

use leave_ledger::api::{AppState, create_router};
use leave_ledger::config::{ConfigLoader, ServerSettings};
use leave_ledger::error::LedgerError;
use leave_ledger::ledger::LedgerEngine;
use leave_ledger::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("leave-ledger: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let settings = ServerSettings::from_env()?;
    telemetry::init(&settings.log_level)?;

    let config = match &settings.policy_path {
        Some(path) => ConfigLoader::load(path)?,
        None => {
            warn!("LEDGER_POLICY_PATH not set; using builtin policy and an empty roster");
            ConfigLoader::default()
        }
    };

    let engine = LedgerEngine::in_memory(
        config.employees().iter().cloned(),
        config.leave_policy().clone(),
    );
    let state = AppState::new(engine, config.metadata().clone());
    let app = create_router(state);

    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        policy = %config.metadata().name,
        policy_version = %config.metadata().version,
        employees = config.employees().len(),
        "leave ledger listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("leave ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
