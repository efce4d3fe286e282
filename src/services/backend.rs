// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Clestiq Shield REST API client.
//!
//! Handles:
//! - Bearer authentication on every account-scoped call
//! - Mapping backend status codes onto [`AppError`]
//! - Formatting FastAPI-style `detail` payloads for display

use crate::error::AppError;
use crate::models::{ApiKey, Application, CreatedApiKey, User, UserUpdate};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Clestiq Shield API client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Older backends return only the token
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct NamePayload<'a> {
    name: &'a str,
}

impl BackendClient {
    /// Create a client for the versioned API at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // ─── Auth ────────────────────────────────────────────────────

    /// Exchange credentials for an access token (OAuth2 password form).
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }

    /// Register a new account.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(transport_error)?;

        check_response_json(response).await
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Get the profile of the token's owner.
    pub async fn current_user(&self, token: &str) -> Result<User, AppError> {
        self.send_json(self.request(Method::GET, "/users/", token))
            .await
    }

    /// Patch the profile; returns the server's representation.
    pub async fn update_user(&self, token: &str, patch: &UserUpdate) -> Result<User, AppError> {
        self.send_json(self.request(Method::PATCH, "/users/", token).json(patch))
            .await
    }

    // ─── Applications ────────────────────────────────────────────

    pub async fn list_apps(&self, token: &str) -> Result<Vec<Application>, AppError> {
        self.send_json(self.request(Method::GET, "/apps/", token))
            .await
    }

    pub async fn create_app(&self, token: &str, name: &str) -> Result<Application, AppError> {
        self.send_json(
            self.request(Method::POST, "/apps/", token)
                .json(&NamePayload { name }),
        )
        .await
    }

    pub async fn get_app(&self, token: &str, app_id: &str) -> Result<Application, AppError> {
        let path = format!("/apps/{}", urlencoding::encode(app_id));
        self.send_json(self.request(Method::GET, &path, token)).await
    }

    pub async fn delete_app(&self, token: &str, app_id: &str) -> Result<(), AppError> {
        let path = format!("/apps/{}", urlencoding::encode(app_id));
        self.send(self.request(Method::DELETE, &path, token)).await
    }

    // ─── API Keys ────────────────────────────────────────────────

    pub async fn list_keys(&self, token: &str, app_id: &str) -> Result<Vec<ApiKey>, AppError> {
        let path = format!("/apps/{}/keys", urlencoding::encode(app_id));
        self.send_json(self.request(Method::GET, &path, token)).await
    }

    /// Create a key. The returned secret is not retrievable again.
    pub async fn create_key(
        &self,
        token: &str,
        app_id: &str,
        name: &str,
    ) -> Result<CreatedApiKey, AppError> {
        let path = format!("/apps/{}/keys", urlencoding::encode(app_id));
        self.send_json(
            self.request(Method::POST, &path, token)
                .json(&NamePayload { name }),
        )
        .await
    }

    pub async fn revoke_key(&self, token: &str, app_id: &str, key_id: &str) -> Result<(), AppError> {
        let path = format!(
            "/apps/{}/keys/{}",
            urlencoding::encode(app_id),
            urlencoding::encode(key_id)
        );
        self.send(self.request(Method::DELETE, &path, token)).await
    }

    // ─── Plumbing ────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.http.request(method, self.url(path)).bearer_auth(token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<(), AppError> {
        let response = request.send().await.map_err(transport_error)?;
        check_response(response).await
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, AppError> {
        let response = request.send().await.map_err(transport_error)?;
        check_response_json(response).await
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    AppError::Backend(format!("request failed: {err}"))
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(error_from_response(status, &body))
}

/// Check response and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_response(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Backend(format!("invalid response body: {e}")))
}

/// Map a non-success backend response onto the error taxonomy.
pub fn error_from_response(status: StatusCode, body: &str) -> AppError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| format_error_detail(&value));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::warn!(status = status.as_u16(), "Backend rejected session token");
            AppError::SessionRejected {
                status: status.as_u16(),
                detail,
            }
        }
        StatusCode::NOT_FOUND => {
            AppError::NotFound(detail.unwrap_or_else(|| "resource not found".to_string()))
        }
        StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(detail.unwrap_or_else(|| "invalid input".to_string()))
        }
        _ => AppError::Backend(format!(
            "HTTP {}: {}",
            status,
            detail.unwrap_or_else(|| body.chars().take(200).collect())
        )),
    }
}

/// Extract a human-readable message from an error payload.
///
/// `detail` may be a plain string or a list of `{loc, msg}` entries, which
/// are rendered as `loc1 -> loc2: msg` and joined with `, `.
pub fn format_error_detail(value: &serde_json::Value) -> Option<String> {
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => return Some(detail.clone()),
        Some(serde_json::Value::Array(entries)) if !entries.is_empty() => {
            let parts: Vec<String> = entries.iter().map(format_detail_entry).collect();
            return Some(parts.join(", "));
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

fn format_detail_entry(entry: &serde_json::Value) -> String {
    let loc = entry
        .get("loc")
        .and_then(|l| l.as_array())
        .map(|parts| {
            parts
                .iter()
                .map(|p| match p {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        })
        .unwrap_or_default();
    let msg = entry.get("msg").and_then(|m| m.as_str()).unwrap_or("invalid");

    format!("{loc}: {msg}")
}
