//! Startup helpers for the concierge server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::server::{self, AppState};

/// Environment variable for the server port.
const PORT_ENV: &str = "CONCIERGE_PORT";

/// Run the server until Ctrl+C.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting H Brothers Concierge v{}", env!("CARGO_PKG_VERSION"));

    let port = get_port();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    rt.block_on(async {
        let state = match AppState::new().await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!("Failed to create state: {e}");
                return ExitCode::from(1);
            }
        };

        if let Err(e) = server::run_server_with_shutdown(state, port, shutdown_signal()).await {
            tracing::error!("Server error: {e}");
            return ExitCode::from(1);
        }

        ExitCode::SUCCESS
    })
}

/// Initialize application state without starting the server.
///
/// # Errors
/// Returns an error if state creation fails.
pub async fn initialize() -> Result<Arc<AppState>, Box<dyn std::error::Error + Send + Sync>> {
    AppState::new().await
}

/// Get the configured server port.
#[must_use]
pub fn get_port() -> u16 {
    std::env::var(PORT_ENV)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(server::DEFAULT_PORT)
}

/// Resolve when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
    }
}
