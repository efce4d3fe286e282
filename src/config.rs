// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Application configuration loaded from environment variables.

use std::env;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Versioned base URL of the Clestiq Shield REST API (no trailing slash)
    pub api_base_url: String,
    /// URL the dashboard itself is served under
    pub public_url: String,
    /// Server port
    pub port: u16,
    /// Timeout applied to every backend request
    pub backend_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string());

        Ok(Self {
            api_base_url: normalize_url("API_BASE_URL", &api_base_url)?,
            public_url: normalize_url("PUBLIC_URL", &public_url)?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", "not a port number".to_string()))?,
            backend_timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::Invalid("BACKEND_TIMEOUT_SECS", "not a number".to_string())
                })?,
        })
    }

    /// Config for tests, pointing the API client at `api_base_url`.
    pub fn test_default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            port: 3000,
            backend_timeout_secs: 5,
        }
    }

    /// Whether cookies must carry the `Secure` flag.
    ///
    /// Only set when the dashboard is served over https, otherwise browsers
    /// drop the cookie on plain-http development hosts.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

fn normalize_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed =
        reqwest::Url::parse(trimmed).map_err(|e| ConfigError::Invalid(name, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::Invalid(
            name,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
