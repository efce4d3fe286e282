// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Clestiq Shield WebPlatform server
//!
//! Serves the account dashboard and talks to the Clestiq Shield REST API on
//! behalf of the signed-in user.

use clestiq_webplatform::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        api_base_url = %config.api_base_url,
        "Starting Clestiq Shield WebPlatform"
    );

    let state = Arc::new(AppState::new(config.clone())?);
    let app = clestiq_webplatform::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clestiq_webplatform=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
