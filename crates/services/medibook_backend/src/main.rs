// --- File: crates/services/medibook_backend/src/main.rs ---
use std::process::ExitCode;
use std::sync::Arc;

use medibook_backend::{app::build_router, app_state::AppState};
use medibook_common::{logging, MedibookError};
use medibook_config::load_config;
use tokio::net::TcpListener;
use tracing::{error, info};

async fn run() -> Result<(), MedibookError> {
    let config = Arc::new(load_config()?);
    info!(
        "Runtime flags: use_gcal={} use_auth={} use_email={}",
        config.use_gcal, config.use_auth, config.use_email
    );

    let state = AppState::new(config.clone()).await;
    let app = build_router(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
