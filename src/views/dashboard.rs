// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Dashboard and metrics pages.

use super::{error_banner, escape, format_cost, layout};
use crate::models::{AppUsage, Application, KeyUsage, UsageReport, User};
use crate::time_utils::format_date;

const RECENT_APPS: usize = 3;

/// Data behind the dashboard page.
pub struct DashboardView<'a> {
    pub user: Option<&'a User>,
    /// `None` when the metrics could not be loaded
    pub report: Option<&'a UsageReport>,
    /// All applications, newest first
    pub apps: &'a [Application],
    pub error: Option<&'a str>,
}

pub fn dashboard_page(view: &DashboardView<'_>) -> String {
    let display_name = view.user.map(User::display_name).unwrap_or("User");
    let stat = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let report = view.report;

    let account = match view.user {
        Some(user) => format!(
            r#"<span class="badge {class}">{status}</span>
            <p class="muted">{email}<br>Member since {since}</p>"#,
            class = if user.is_active { "ok" } else { "off" },
            status = if user.is_active { "Active" } else { "Inactive" },
            email = escape(&user.email),
            since = user
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
        ),
        None => r#"<p class="muted">Profile unavailable</p>"#.to_string(),
    };

    let insights = report.map(insights_section).unwrap_or_default();

    let recent: String = view
        .apps
        .iter()
        .take(RECENT_APPS)
        .map(|app| {
            format!(
                r#"<tr><td><a href="/apps/{id}">{name}</a></td><td class="muted">Created {created}</td></tr>"#,
                id = escape(&urlencoding::encode(&app.id)),
                name = escape(&app.name),
                created = format_date(&app.created_at),
            )
        })
        .collect();
    let recent = if recent.is_empty() {
        r#"<p class="muted">No applications found. Create your first app to get started.</p>"#
            .to_string()
    } else {
        format!("<table>{recent}</table>")
    };
    let view_all = if view.apps.len() > RECENT_APPS {
        r#"<p><a href="/apps">View All Applications</a></p>"#
    } else {
        ""
    };

    let body = format!(
        r#"<h1>Dashboard</h1>
        <p class="muted">Welcome back, {name}.</p>
        {error}
        <div class="grid">
            <div class="card"><div class="muted">Total Applications</div><div class="stat" id="total-apps">{total_apps}</div></div>
            <div class="card"><div class="muted">Active Keys</div><div class="stat" id="active-keys">{active_keys}</div><p class="muted">Keys currently authorized for requests.</p></div>
            <div class="card"><div class="muted">Total Requests</div><div class="stat" id="total-requests">{total_requests}</div></div>
            <div class="card"><div class="muted">Estimated Cost</div><div class="stat" id="estimated-cost">{cost}</div></div>
            <div class="card"><div class="muted">Account Status</div>{account}</div>
        </div>
        {insights}
        <div class="card">
            <h2>Recent Applications</h2>
            {recent}
            {view_all}
        </div>"#,
        name = escape(display_name),
        error = error_banner(view.error),
        total_apps = stat(report.map(|r| r.total_apps().to_string())),
        active_keys = stat(report.map(|r| r.active_keys().to_string())),
        total_requests = stat(report.map(|r| r.total_requests().to_string())),
        cost = stat(report.map(|r| format_cost(r.estimated_cost()))),
    );

    layout("Dashboard", view.user, &body)
}

fn insights_section(report: &UsageReport) -> String {
    let disabled = report.top_by_disabled(3);
    let disabled = if disabled.is_empty() {
        r#"<p class="muted">No disabled keys.</p>"#.to_string()
    } else {
        app_list(&disabled, |a| format!("{} disabled", a.disabled_keys))
    };

    format!(
        r#"<h2>Analytics &amp; Insights</h2>
        <div class="grid">
            <div class="card" id="top-cost"><h3>Highest Cost</h3>{cost}</div>
            <div class="card" id="top-disabled"><h3>Disabled Keys</h3>{disabled}</div>
            <div class="card" id="top-usage"><h3>Top Apps by Usage</h3>{usage}</div>
            <div class="card" id="top-key-count"><h3>Most Keys</h3>{key_count}</div>
        </div>
        <div class="card" id="top-keys"><h3>Top Keys</h3>{keys}</div>"#,
        cost = app_list(&report.top_by_cost(3), |a| format_cost(a.cost)),
        disabled = disabled,
        usage = app_list(&report.top_by_usage(5), |a| format!("{} requests", a.requests)),
        key_count = app_list(&report.top_by_key_count(5), |a| format!("{} keys", a.key_count)),
        keys = key_table(&report.top_keys(5)),
    )
}

fn app_list(apps: &[&AppUsage], value: impl Fn(&AppUsage) -> String) -> String {
    if apps.is_empty() {
        return r#"<p class="muted">No data yet.</p>"#.to_string();
    }

    let rows: String = apps
        .iter()
        .enumerate()
        .map(|(i, usage)| {
            format!(
                r#"<tr><td>{rank}</td><td><a href="/apps/{id}">{name}</a></td><td>{value}</td></tr>"#,
                rank = i + 1,
                id = escape(&urlencoding::encode(&usage.app.id)),
                name = escape(&usage.app.name),
                value = escape(&value(*usage)),
            )
        })
        .collect();
    format!("<table>{rows}</table>")
}

fn key_table(keys: &[&KeyUsage]) -> String {
    if keys.is_empty() {
        return r#"<p class="muted">No API keys yet.</p>"#.to_string();
    }

    let rows: String = keys
        .iter()
        .map(|k| {
            format!(
                r#"<tr><td>{name}</td><td><code>{prefix}…</code></td><td>{app}</td><td>{status}</td><td>{requests}</td></tr>"#,
                name = escape(k.key.name.as_deref().unwrap_or("Unnamed key")),
                prefix = escape(&k.key.key_prefix),
                app = escape(&k.app_name),
                status = if k.key.is_active { "Active" } else { "Disabled" },
                requests = k.key.requests(),
            )
        })
        .collect();

    format!(
        "<table><thead><tr><th>Key</th><th>Prefix</th><th>Application</th><th>Status</th><th>Requests</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

/// Metrics page: global totals and rankings.
pub fn metrics_page(user: Option<&User>, report: Option<&UsageReport>, error: Option<&str>) -> String {
    let empty = UsageReport::default();
    let report = report.unwrap_or(&empty);

    let top_apps = report.top_by_usage(5);
    let max_requests = top_apps.first().map(|a| a.requests).unwrap_or(0).max(1);
    let bars: String = top_apps
        .iter()
        .map(|usage| {
            let percent = usage.requests as f64 / max_requests as f64 * 100.0;
            format!(
                r#"<div><div>{name} <span class="muted">{requests}</span></div><div class="bar" style="width: {percent:.0}%"></div></div>"#,
                name = escape(&usage.app.name),
                requests = usage.requests,
            )
        })
        .collect();
    let bars = if bars.is_empty() {
        r#"<p class="muted">No usage data available.</p>"#.to_string()
    } else {
        bars
    };

    let body = format!(
        r#"<h1>Metrics</h1>
        {error}
        <div class="grid">
            <div class="card"><div class="muted">Total Requests</div><div class="stat" id="total-requests">{total_requests}</div></div>
            <div class="card"><div class="muted">Total Keys</div><div class="stat" id="total-keys">{total_keys}</div></div>
            <div class="card"><div class="muted">Active Keys</div><div class="stat" id="active-keys">{active_keys}</div><p class="muted">{active_percent:.0}% of all keys</p></div>
            <div class="card"><div class="muted">Avg Requests / App</div><div class="stat" id="avg-requests">{avg}</div></div>
            <div class="card"><div class="muted">Estimated Cost</div><div class="stat" id="estimated-cost">{cost}</div></div>
        </div>
        <div class="card" id="usage-chart"><h2>Top Applications by Usage</h2>{bars}</div>
        <div class="card" id="top-keys"><h2>Top Keys</h2>{keys}</div>"#,
        error = error_banner(error),
        total_requests = report.total_requests(),
        total_keys = report.total_keys(),
        active_keys = report.active_keys(),
        active_percent = report.active_key_ratio() * 100.0,
        avg = report.avg_requests_per_app(),
        cost = format_cost(report.estimated_cost()),
        keys = key_table(&report.top_keys(10)),
    );

    layout("Metrics", user, &body)
}
