use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;

use bdi_api::api::{router, AppState};
use bdi_api::config::Settings;
use bdi_api::deployment::{check, DeploymentTopology};

/// Logs every way the running process contradicts the deployment manifest
fn check_topology(settings: &Settings) -> anyhow::Result<()> {
    let topology = match &settings.topology_path {
        Some(path) => DeploymentTopology::load(path)
            .with_context(|| format!("failed to load topology {}", path.display()))?,
        None => DeploymentTopology::documented()?,
    };
    let violations = check(&topology.with_settings(settings)?);

    if violations.is_empty() {
        tracing::info!("Deployment topology is consistent");
    }
    for violation in &violations {
        tracing::warn!(%violation, "Deployment topology violation");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    bdi_api::init_tracing();

    // Load settings, .env included
    let settings = Settings::from_env()?;

    if let Err(e) = check_topology(&settings) {
        tracing::warn!(error = %e, "Skipping deployment topology check");
    }

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(&settings.db_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Database connected successfully");

    let addr = SocketAddr::from((settings.host, settings.port));
    let state = AppState::new(settings, pool).await?;
    let app = router(state);

    // Start server
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind address")?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
