// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Fetches applications and their keys and reduces them to a [`UsageReport`].

use futures_util::future::try_join_all;

use crate::error::AppError;
use crate::models::{Application, UsageReport};
use crate::services::BackendClient;
use crate::time_utils::parse_timestamp;

/// List every application, then aggregate usage over all of them.
pub async fn load_report(backend: &BackendClient, token: &str) -> Result<UsageReport, AppError> {
    let apps = backend.list_apps(token).await?;
    collect_report(backend, token, apps).await
}

/// Fetch the keys of every application concurrently and aggregate them.
///
/// A single failed key listing fails the whole report; there is no
/// per-application retry.
pub async fn collect_report(
    backend: &BackendClient,
    token: &str,
    apps: Vec<Application>,
) -> Result<UsageReport, AppError> {
    tracing::debug!(apps = apps.len(), "Fetching keys for usage report");

    let key_lists = try_join_all(apps.iter().map(|app| backend.list_keys(token, &app.id))).await?;

    Ok(UsageReport::from_collections(
        apps.into_iter().zip(key_lists).collect(),
    ))
}

/// Sort applications newest first. Unparseable timestamps sort last.
pub fn sort_newest_first(apps: &mut [Application]) {
    apps.sort_by(|a, b| {
        let a_time = parse_timestamp(&a.created_at);
        let b_time = parse_timestamp(&b.created_at);
        b_time.cmp(&a_time)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, created_at: &str) -> Application {
        Application {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut apps = vec![
            app("old", "2025-03-01T00:00:00Z"),
            app("broken", "not a date"),
            app("new", "2026-02-01T00:00:00.000001"),
            app("mid", "2025-12-24T08:00:00+00:00"),
        ];
        sort_newest_first(&mut apps);

        let ids: Vec<&str> = apps.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old", "broken"]);
    }
}
