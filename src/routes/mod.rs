// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! HTTP route handlers.

pub mod account;
pub mod apps;
pub mod auth;
pub mod dashboard;

use crate::middleware::{resolve_session, route_gate};
use crate::session::{TokenStore, DASHBOARD_PATH, LOGIN_PATH};
use crate::AppState;
use axum::response::Redirect;
use axum::{middleware, routing::get, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use validator::ValidationErrors;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Landing page: straight to the dashboard or the login screen.
async fn index(jar: CookieJar) -> Redirect {
    if TokenStore::get(&jar).is_some() {
        Redirect::to(DASHBOARD_PATH)
    } else {
        Redirect::to(LOGIN_PATH)
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .merge(auth::routes());

    // Protected routes (session resolved before the handler runs)
    let protected_routes = Router::new()
        .merge(dashboard::routes())
        .merge(apps::routes())
        .merge(account::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(route_gate))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Flatten form validation errors into one line for display.
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field}: invalid"))
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        "Invalid input".to_string()
    } else {
        messages.join("; ")
    }
}
