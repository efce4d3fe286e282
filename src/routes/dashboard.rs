// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Dashboard and metrics pages.

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::UsageReport;
use crate::services::usage::{collect_report, load_report, sort_newest_first};
use crate::session::SessionContext;
use crate::views::dashboard::{dashboard_page, metrics_page, DashboardView};
use crate::AppState;

const DASHBOARD_LOAD_FAILED: &str = "Failed to load dashboard metrics";
const METRICS_LOAD_FAILED: &str = "Failed to load metrics";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/metrics", get(metrics))
}

/// Keep authorization failures fatal; anything else degrades to a banner.
fn degrade(err: AppError, what: &'static str) -> Result<&'static str> {
    if err.is_auth_failure() {
        return Err(err);
    }
    tracing::warn!(error = %err, "{what}");
    Ok(what)
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>> {
    let token = session.bearer()?;

    let loaded = async {
        let mut apps = state.backend.list_apps(token).await?;
        sort_newest_first(&mut apps);
        let report = collect_report(&state.backend, token, apps.clone()).await?;
        Ok::<_, AppError>((apps, report))
    }
    .await;

    let (apps, report, error) = match loaded {
        Ok((apps, report)) => (apps, Some(report), None),
        Err(err) => (Vec::new(), None, Some(degrade(err, DASHBOARD_LOAD_FAILED)?)),
    };

    Ok(Html(dashboard_page(&DashboardView {
        user: session.user(),
        report: report.as_ref(),
        apps: &apps,
        error,
    })))
}

async fn metrics(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>> {
    let token = session.bearer()?;

    let (report, error): (Option<UsageReport>, _) = match load_report(&state.backend, token).await {
        Ok(report) => (Some(report), None),
        Err(err) => (None, Some(degrade(err, METRICS_LOAD_FAILED)?)),
    };

    Ok(Html(metrics_page(session.user(), report.as_ref(), error)))
}
