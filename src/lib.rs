mod cli;
mod commands;
pub mod core;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use crate::cli::Args;
pub use crate::commands::router;
use crate::core::state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Parse flags, start logging and serve the web UI until the process stops.
pub async fn run() -> Result<(), BoxError> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fabric_setup_lib=debug")),
        )
        .init();

    let settings = Args::parse().into_settings();
    tracing::info!("fabric-setup starting, state dir {:?}", settings.data_dir);

    tokio::fs::create_dir_all(&settings.data_dir).await?;

    let addr = settings.bind_addr();
    let state = Arc::new(AppState::new(settings)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web UI listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
