// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Application error types with consistent page responses.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::session::LOGIN_PATH;

/// Marks a response produced by an authorization failure.
///
/// The session middleware owns the cookie and the profile cache, so it turns
/// this marker into a removal cookie and an eviction.
#[derive(Debug, Clone, Copy)]
pub struct SessionEnded;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    /// The backend refused the bearer token (401, or 403 for a revoked account).
    #[error("Session rejected by backend (HTTP {status})")]
    SessionRejected { status: u16, detail: Option<String> },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Backend API error: {0}")]
    Backend(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures that invalidate the stored session token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::Unauthorized | AppError::SessionRejected { .. }
        )
    }

    /// Message suitable for showing next to a form.
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::SessionRejected { detail, .. } => detail.clone(),
            AppError::Validation(msg) | AppError::BadRequest(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            AppError::Unauthorized | AppError::SessionRejected { .. } => {
                tracing::info!(error = %self, "Session ended, redirecting to login");
                let mut response = Redirect::to(LOGIN_PATH).into_response();
                response.extensions_mut().insert(SessionEnded);
                return response;
            }
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid input",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg.clone()),
            AppError::Backend(msg) => {
                tracing::error!(error = %msg, "Backend API error");
                (
                    StatusCode::BAD_GATEWAY,
                    "Service unavailable",
                    "The Clestiq Shield API could not complete the request. Please try again."
                        .to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        (status, Html(crate::views::error_page(title, &message))).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
