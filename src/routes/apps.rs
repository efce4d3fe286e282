// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Application and API key management routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::validation_message;
use crate::error::{AppError, Result};
use crate::models::Application;
use crate::services::usage::sort_newest_first;
use crate::session::SessionContext;
use crate::views::apps::{
    app_detail_page, apps_page, delete_app_page, revoke_key_page, AppDetailView,
};
use crate::AppState;

const DELETE_FAILED: &str = "Failed to delete application. It may have dependencies.";
const CREATE_APP_FAILED: &str = "Failed to create application.";
const CREATE_KEY_FAILED: &str = "Failed to create API key.";
const REFRESH_FAILED: &str = "Could not reload the key list. Refresh the page to see it.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/apps", get(list_apps).post(create_app))
        .route("/apps/{id}", get(app_detail))
        .route("/apps/{id}/delete", get(confirm_delete).post(delete_app))
        .route("/apps/{id}/keys", axum::routing::post(create_key))
        .route(
            "/apps/{id}/keys/{key_id}/revoke",
            get(confirm_revoke).post(revoke_key),
        )
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NameForm {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
}

impl NameForm {
    /// Trimmed name, rejecting blank input.
    fn checked_name(&self) -> std::result::Result<&str, String> {
        self.validate().map_err(|e| validation_message(&e))?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        Ok(name)
    }
}

/// Applications newest first, filtered by `query`.
async fn load_apps(state: &AppState, token: &str, query: &str) -> Result<Vec<Application>> {
    let mut apps = state.backend.list_apps(token).await?;
    sort_newest_first(&mut apps);
    apps.retain(|app| app.matches(query));
    Ok(apps)
}

/// Render the list page with an error banner. A failing re-fetch leaves the
/// list empty rather than masking the original error.
async fn apps_page_with_error(
    state: &AppState,
    session: &SessionContext,
    token: &str,
    message: &str,
) -> Result<Response> {
    let apps = match load_apps(state, token, "").await {
        Ok(apps) => apps,
        Err(err) if err.is_auth_failure() => return Err(err),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to reload applications");
            Vec::new()
        }
    };
    Ok(Html(apps_page(session.user(), &apps, "", Some(message))).into_response())
}

/// Failures that should end the request rather than render a banner.
fn fatal(err: AppError) -> Result<AppError> {
    if err.is_auth_failure() {
        Err(err)
    } else {
        Ok(err)
    }
}

async fn list_apps(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>> {
    let token = session.bearer()?;
    let apps = load_apps(&state, token, &params.q).await?;
    Ok(Html(apps_page(session.user(), &apps, &params.q, None)))
}

async fn create_app(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<NameForm>,
) -> Result<Response> {
    let token = session.bearer()?;

    let name = match form.checked_name() {
        Ok(name) => name,
        Err(message) => return apps_page_with_error(&state, &session, token, &message).await,
    };

    match state.backend.create_app(token, name).await {
        Ok(app) => {
            tracing::info!(app_id = %app.id, "Application created");
            Ok(Redirect::to("/apps").into_response())
        }
        Err(err) => {
            let err = fatal(err)?;
            tracing::warn!(error = %err, "Failed to create application");
            let message = err
                .user_message()
                .unwrap_or_else(|| CREATE_APP_FAILED.to_string());
            apps_page_with_error(&state, &session, token, &message).await
        }
    }
}

async fn app_detail(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let token = session.bearer()?;
    let (app, keys) = tokio::try_join!(
        state.backend.get_app(token, &id),
        state.backend.list_keys(token, &id)
    )?;

    Ok(Html(app_detail_page(&AppDetailView {
        user: session.user(),
        app: &app,
        keys: &keys,
        created_secret: None,
        error: None,
    })))
}

/// Create a key and show its secret. The response is the only place the
/// secret ever appears, so it is rendered directly and never cached.
async fn create_key(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<NameForm>,
) -> Result<Response> {
    let token = session.bearer()?;

    let outcome = match form.checked_name() {
        Ok(name) => state
            .backend
            .create_key(token, &id, name)
            .await
            .map(|created| created.into_parts().1)
            .map_err(|err| {
                tracing::warn!(app_id = %id, error = %err, "Failed to create API key");
                err
            }),
        Err(message) => Err(AppError::Validation(message)),
    };

    let (secret, error) = match outcome {
        Ok(secret) => {
            tracing::info!(app_id = %id, "API key created");
            (Some(secret), None)
        }
        Err(err) => {
            let err = fatal(err)?;
            let message = err
                .user_message()
                .unwrap_or_else(|| CREATE_KEY_FAILED.to_string());
            (None, Some(message))
        }
    };

    // The secret is already issued: a failed refresh degrades the page
    // instead of replacing it.
    let (app, keys) = tokio::join!(
        state.backend.get_app(token, &id),
        state.backend.list_keys(token, &id)
    );
    let mut refresh_failed = false;
    let app = match app {
        Ok(app) => app,
        Err(err) => {
            let err = fatal(err)?;
            tracing::warn!(app_id = %id, error = %err, "Failed to reload application");
            refresh_failed = true;
            Application {
                id: id.clone(),
                name: id.clone(),
                description: None,
                created_at: String::new(),
            }
        }
    };
    let keys = match keys {
        Ok(keys) => keys,
        Err(err) => {
            let err = fatal(err)?;
            tracing::warn!(app_id = %id, error = %err, "Failed to reload API keys");
            refresh_failed = true;
            Vec::new()
        }
    };
    let error = error.or_else(|| refresh_failed.then(|| REFRESH_FAILED.to_string()));

    let html = app_detail_page(&AppDetailView {
        user: session.user(),
        app: &app,
        keys: &keys,
        created_secret: secret.as_deref(),
        error: error.as_deref(),
    });

    Ok(([(header::CACHE_CONTROL, "no-store")], Html(html)).into_response())
}

/// Count the keys of an application before deletion.
///
/// `None` when the pre-check itself failed for a reason other than
/// authorization; the backend then has the final word.
async fn key_count(state: &AppState, token: &str, id: &str) -> Result<Option<usize>> {
    match state.backend.list_keys(token, id).await {
        Ok(keys) => Ok(Some(keys.len())),
        Err(err) => {
            let err = fatal(err)?;
            tracing::warn!(app_id = %id, error = %err, "Key pre-check failed");
            Ok(None)
        }
    }
}

async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let token = session.bearer()?;
    let app = state.backend.get_app(token, &id).await?;
    let keys = key_count(&state, token, &id).await?.unwrap_or(0);

    Ok(Html(delete_app_page(session.user(), &app, keys)))
}

async fn delete_app(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Response> {
    let token = session.bearer()?;

    if let Some(keys) = key_count(&state, token, &id).await? {
        if keys > 0 {
            tracing::info!(app_id = %id, keys, "Delete blocked by remaining keys");
            let app = state.backend.get_app(token, &id).await?;
            return Ok((
                StatusCode::CONFLICT,
                Html(delete_app_page(session.user(), &app, keys)),
            )
                .into_response());
        }
    }

    match state.backend.delete_app(token, &id).await {
        Ok(()) => {
            tracing::info!(app_id = %id, "Application deleted");
            Ok(Redirect::to("/apps").into_response())
        }
        Err(err) => {
            let err = fatal(err)?;
            tracing::warn!(app_id = %id, error = %err, "Failed to delete application");
            apps_page_with_error(&state, &session, token, DELETE_FAILED).await
        }
    }
}

async fn confirm_revoke(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path((id, key_id)): Path<(String, String)>,
) -> Result<Html<String>> {
    let token = session.bearer()?;
    let (app, keys) = tokio::try_join!(
        state.backend.get_app(token, &id),
        state.backend.list_keys(token, &id)
    )?;

    let key = keys
        .iter()
        .find(|k| k.id == key_id)
        .ok_or_else(|| AppError::NotFound(format!("API key {key_id}")))?;

    Ok(Html(revoke_key_page(session.user(), &app, key)))
}

async fn revoke_key(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path((id, key_id)): Path<(String, String)>,
) -> Result<Redirect> {
    let token = session.bearer()?;
    state.backend.revoke_key(token, &id, &key_id).await?;
    tracing::info!(app_id = %id, key_id = %key_id, "API key revoked");

    Ok(Redirect::to(&format!("/apps/{}", urlencoding::encode(&id))))
}
