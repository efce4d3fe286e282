// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Clestiq Shield WebPlatform: account dashboard for the Clestiq Shield API
//!
//! This crate serves the server-rendered dashboard. It signs users in against
//! the Clestiq Shield REST API, keeps the session token in a cookie, and
//! aggregates applications and API keys into usage metrics.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod views;

use config::Config;
use services::BackendClient;
use session::ProfileCache;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub profiles: ProfileCache,
}

impl AppState {
    /// Build the state, creating the backend client from `config`.
    pub fn new(config: Config) -> Result<Self, error::AppError> {
        let backend = BackendClient::new(
            &config.api_base_url,
            std::time::Duration::from_secs(config.backend_timeout_secs),
        )?;

        Ok(Self {
            config,
            backend,
            profiles: ProfileCache::default(),
        })
    }
}
