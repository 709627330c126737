//! Earthquake Risk Service - Main Entry Point

use api::{build_state, init_logging, run_server, startup, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== LEPAM Earthquake Risk Service v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    let state = build_state(&settings)?;

    // Model load, initial fetch and initial prediction before serving.
    startup(&state).await;

    run_server(&settings.bind_addr, state).await?;

    Ok(())
}
