// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Application and API key management pages.

use super::{error_banner, escape, layout};
use crate::models::{ApiKey, Application, User};
use crate::time_utils::format_date;

fn app_href(app: &Application) -> String {
    format!("/apps/{}", escape(&urlencoding::encode(&app.id)))
}

/// Application list with search and create form. `apps` is already filtered.
pub fn apps_page(user: Option<&User>, apps: &[Application], query: &str, error: Option<&str>) -> String {
    let rows: String = apps
        .iter()
        .map(|app| {
            format!(
                r#"<tr><td><a href="{href}">{name}</a></td><td><code>{id}</code></td><td>{created}</td><td><a href="{href}/delete">Delete</a></td></tr>"#,
                href = app_href(app),
                name = escape(&app.name),
                id = escape(&app.id),
                created = format_date(&app.created_at),
            )
        })
        .collect();

    let list = if rows.is_empty() {
        if query.trim().is_empty() {
            r#"<p class="muted">No applications yet. Create one above.</p>"#.to_string()
        } else {
            format!(
                r#"<p class="muted">No applications match "{}".</p>"#,
                escape(query)
            )
        }
    } else {
        format!(
            "<table><thead><tr><th>Name</th><th>ID</th><th>Created</th><th></th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    let body = format!(
        r#"<h1>Applications</h1>
        <p class="muted">Manage your API keys and integrations.</p>
        {error}
        <div class="card">
            <form method="post" action="/apps">
                <label for="name">New application</label>
                <input type="text" id="name" name="name" placeholder="My application" required>
                <button type="submit">Create application</button>
            </form>
        </div>
        <div class="card">
            <form method="get" action="/apps">
                <input type="search" name="q" value="{query}" placeholder="Search by name or ID">
            </form>
            {list}
        </div>"#,
        error = error_banner(error),
        query = escape(query),
    );

    layout("Applications", user, &body)
}

/// Data behind the application detail page.
pub struct AppDetailView<'a> {
    pub user: Option<&'a User>,
    pub app: &'a Application,
    pub keys: &'a [ApiKey],
    /// Secret of a key created by this very request
    pub created_secret: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub fn app_detail_page(view: &AppDetailView<'_>) -> String {
    let app = view.app;
    let href = app_href(app);

    let secret = view
        .created_secret
        .map(|secret| {
            format!(
                r#"<div class="card" id="new-key-secret">
            <h2>Your new API key</h2>
            <p class="notice">Copy this key now. It will not be shown again.</p>
            <div class="secret">{}</div>
        </div>"#,
                escape(secret)
            )
        })
        .unwrap_or_default();

    let rows: String = view
        .keys
        .iter()
        .map(|key| {
            format!(
                r#"<tr><td>{name}</td><td><code>{prefix}…</code></td><td><span class="badge {class}">{status}</span></td><td>{requests}</td><td>{created}</td><td>{last_used}</td><td><a href="{href}/keys/{key_id}/revoke">Revoke</a></td></tr>"#,
                name = escape(key.name.as_deref().unwrap_or("Unnamed key")),
                prefix = escape(&key.key_prefix),
                class = if key.is_active { "ok" } else { "off" },
                status = if key.is_active { "Active" } else { "Disabled" },
                requests = key.requests(),
                created = format_date(&key.created_at),
                last_used = key
                    .last_used_at
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| "Never".to_string()),
                key_id = escape(&urlencoding::encode(&key.id)),
            )
        })
        .collect();

    let keys = if rows.is_empty() {
        r#"<p class="muted">No API keys yet.</p>"#.to_string()
    } else {
        format!(
            "<table><thead><tr><th>Name</th><th>Prefix</th><th>Status</th><th>Requests</th><th>Created</th><th>Last used</th><th></th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    let example_key = view
        .keys
        .iter()
        .find(|k| k.is_active)
        .map(|k| format!("{}...", k.key_prefix))
        .unwrap_or_else(|| "YOUR_API_KEY".to_string());

    let body = format!(
        r#"<p><a href="/apps">&larr; Applications</a></p>
        <h1>{name}</h1>
        <p class="muted">{description}</p>
        <p class="muted">ID <code>{id}</code> · Created {created}</p>
        {error}
        {secret}
        <div class="card">
            <h2>API Keys</h2>
            <form method="post" action="{href}/keys">
                <label for="key-name">Key name</label>
                <input type="text" id="key-name" name="name" placeholder="Production" required>
                <button type="submit">Create key</button>
            </form>
            {keys}
        </div>
        <div class="card">
            <h2>Usage</h2>
            <pre class="secret">curl -H "X-API-Key: {example_key}" https://api.shield.clestiq.com/api/v1/...</pre>
        </div>"#,
        name = escape(&app.name),
        description = escape(app.description.as_deref().unwrap_or("")),
        id = escape(&app.id),
        created = format_date(&app.created_at),
        error = error_banner(view.error),
        example_key = escape(&example_key),
    );

    layout(&app.name, view.user, &body)
}

/// Delete dialog. With keys still attached the dialog blocks deletion.
pub fn delete_app_page(user: Option<&User>, app: &Application, key_count: usize) -> String {
    let href = app_href(app);

    let content = if key_count > 0 {
        format!(
            r#"<div class="card" id="delete-blocked">
            <h1>Cannot delete {name}</h1>
            <p class="error">This application still has {key_count} API key(s). Revoke all keys before deleting the application.</p>
            <p><a href="{href}">Manage keys</a> · <a href="/apps">Back</a></p>
        </div>"#,
            name = escape(&app.name),
        )
    } else {
        format!(
            r#"<div class="card" id="delete-confirm">
            <h1>Delete {name}?</h1>
            <p>This permanently removes the application. This cannot be undone.</p>
            <form method="post" action="{href}/delete">
                <button type="submit" class="danger">Delete application</button>
            </form>
            <p><a href="/apps">Cancel</a></p>
        </div>"#,
            name = escape(&app.name),
        )
    };

    layout("Delete application", user, &content)
}

/// Revoke confirmation for a single key.
pub fn revoke_key_page(user: Option<&User>, app: &Application, key: &ApiKey) -> String {
    let href = app_href(app);
    let body = format!(
        r#"<div class="card" id="revoke-confirm">
            <h1>Revoke key?</h1>
            <p>The key <code>{prefix}…</code> ({name}) of {app_name} will stop working immediately.</p>
            <form method="post" action="{href}/keys/{key_id}/revoke">
                <button type="submit" class="danger">Revoke key</button>
            </form>
            <p><a href="{href}">Cancel</a></p>
        </div>"#,
        prefix = escape(&key.key_prefix),
        name = escape(key.name.as_deref().unwrap_or("Unnamed key")),
        app_name = escape(&app.name),
        key_id = escape(&urlencoding::encode(&key.id)),
    );

    layout("Revoke key", user, &body)
}
