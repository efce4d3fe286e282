// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! HTML views for the dashboard.
//!
//! Plain inline templates without a template engine. Every value that comes
//! from the backend or the user goes through [`escape`].

pub mod account;
pub mod apps;
pub mod auth;
pub mod dashboard;

use crate::models::User;

/// Shared stylesheet for all pages.
const STYLES: &str = r#"
    * { box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        margin: 0;
        background: #0b0f19;
        color: #e5e7eb;
    }
    a { color: #60a5fa; text-decoration: none; }
    nav {
        display: flex;
        gap: 20px;
        align-items: center;
        padding: 14px 32px;
        background: #111827;
        border-bottom: 1px solid #1f2937;
    }
    nav .brand { font-weight: bold; color: #f9fafb; margin-right: auto; }
    nav form { margin: 0; }
    main { max-width: 1100px; margin: 32px auto; padding: 0 24px; }
    h1 { margin-top: 0; }
    .muted { color: #9ca3af; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 16px; }
    .card {
        background: #111827;
        border: 1px solid #1f2937;
        border-radius: 10px;
        padding: 20px;
        margin-bottom: 16px;
    }
    .stat { font-size: 28px; font-weight: bold; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 8px; border-bottom: 1px solid #1f2937; }
    .badge { padding: 2px 8px; border-radius: 999px; font-size: 12px; }
    .badge.ok { background: #064e3b; color: #6ee7b7; }
    .badge.off { background: #3f1d1d; color: #fca5a5; }
    .bar { height: 8px; background: #2563eb; border-radius: 4px; }
    .error { background: #3f1d1d; color: #fecaca; padding: 10px 14px; border-radius: 6px; margin: 12px 0; }
    .notice { background: #1e3a5f; color: #bfdbfe; padding: 10px 14px; border-radius: 6px; margin: 12px 0; }
    .secret { font-family: monospace; background: #030712; padding: 12px; border-radius: 6px; word-break: break-all; }
    input[type=text], input[type=email], input[type=password], input[type=search] {
        width: 100%;
        padding: 8px 10px;
        margin: 4px 0 12px;
        border-radius: 6px;
        border: 1px solid #374151;
        background: #030712;
        color: #e5e7eb;
    }
    button {
        background: #2563eb;
        color: white;
        border: none;
        padding: 8px 16px;
        border-radius: 6px;
        cursor: pointer;
    }
    button.danger { background: #b91c1c; }
    .auth-box { max-width: 380px; margin: 80px auto; }
"#;

/// Page chrome for signed-in pages.
pub fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let who = user
        .map(|u| escape(&u.email))
        .unwrap_or_else(|| "Account".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} · Clestiq Shield</title>
    <style>{STYLES}</style>
</head>
<body>
    <nav>
        <span class="brand">Clestiq Shield</span>
        <a href="/dashboard">Dashboard</a>
        <a href="/apps">Applications</a>
        <a href="/metrics">Metrics</a>
        <a href="/profile">{who}</a>
        <a href="/settings">Settings</a>
        <form method="post" action="/auth/logout"><button type="submit">Sign out</button></form>
    </nav>
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
    )
}

/// Page chrome for the login and signup screens.
pub fn bare_layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} · Clestiq Shield</title>
    <style>{STYLES}</style>
</head>
<body>
    <main class="auth-box">
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
    )
}

/// Standalone error page.
pub fn error_page(title: &str, message: &str) -> String {
    bare_layout(
        title,
        &format!(
            r#"<div class="card">
        <h1>{}</h1>
        <p class="error">{}</p>
        <p><a href="/dashboard">Back to dashboard</a></p>
    </div>"#,
            escape(title),
            escape(message)
        ),
    )
}

/// Inline error banner, empty when there is nothing to show.
pub fn error_banner(error: Option<&str>) -> String {
    error
        .map(|msg| format!(r#"<div class="error">{}</div>"#, escape(msg)))
        .unwrap_or_default()
}

/// Format an estimated cost in USD with four decimals.
pub fn format_cost(cost: f64) -> String {
    format!("${cost:.4}")
}

/// Escape text for HTML element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
