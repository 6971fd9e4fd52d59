//! Verification Gateway
//!
//! HTTP service bridging the configuration and verification steps of
//! the identity-verification demo.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verification_gateway::config::Config;
use verification_gateway::{
    create_router, spawn_sweeper, AppState, HubProofVerifier, OptionsStore, SystemClock,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verification_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting Verification Gateway");
    info!("Verifier hub: {}", config.verifier_url);
    info!(
        "Options TTL: {} min, sweep every {} s",
        config.options_ttl_minutes, config.sweep_interval_secs
    );

    // Options store with wall-clock time; the sweeper runs for the
    // lifetime of the process.
    let store = Arc::new(OptionsStore::new(
        chrono::Duration::minutes(config.options_ttl_minutes),
        Arc::new(SystemClock),
    ));
    spawn_sweeper(
        store.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    );

    let verifier = Arc::new(HubProofVerifier::new(
        config.verifier_url.clone(),
        config.verifier_scope.clone(),
    ));

    let state = AppState::new(store, verifier);
    let app = create_router(state);

    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Verification Gateway running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
