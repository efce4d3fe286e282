// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Profile and settings pages.

use super::{error_banner, escape, layout};
use crate::models::User;
use crate::time_utils::format_date;

/// Profile page. `confirmed` is false when the shown values are local edits
/// the backend has not accepted yet.
pub fn profile_page(
    user: Option<&User>,
    confirmed: bool,
    error: Option<&str>,
    notice: Option<&str>,
) -> String {
    let Some(profile) = user else {
        return layout(
            "Profile",
            None,
            r#"<h1>Profile</h1><p class="error">Profile is temporarily unavailable.</p>"#,
        );
    };

    let pending = if confirmed {
        String::new()
    } else {
        r#"<div class="notice" id="unconfirmed">Changes shown here have not been saved yet.</div>"#
            .to_string()
    };
    let notice = notice
        .map(|msg| format!(r#"<div class="notice">{}</div>"#, escape(msg)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Profile</h1>
        {notice}
        {pending}
        {error}
        <div class="card">
            <form method="post" action="/profile">
                <label for="full_name">Full name</label>
                <input type="text" id="full_name" name="full_name" value="{full_name}">
                <label for="email">Email</label>
                <input type="email" id="email" value="{email}" disabled>
                <button type="submit">Save</button>
            </form>
        </div>
        <div class="card">
            <p class="muted">Account ID <code>{id}</code></p>
            <p class="muted">Member since {since}</p>
        </div>"#,
        error = error_banner(error),
        full_name = escape(profile.full_name.as_deref().unwrap_or("")),
        email = escape(&profile.email),
        id = escape(&profile.id),
        since = profile
            .created_at
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string()),
    );

    layout("Profile", user, &body)
}

pub fn settings_page(user: Option<&User>) -> String {
    let status = match user {
        Some(u) if u.is_active => "Active",
        Some(_) => "Inactive",
        None => "Unknown",
    };

    let body = format!(
        r#"<h1>Settings</h1>
        <div class="card">
            <h2>Account</h2>
            <p>Signed in as <strong>{email}</strong></p>
            <p>Status: {status}</p>
            <p><a href="/profile">Edit profile</a></p>
        </div>
        <div class="card">
            <h2>Session</h2>
            <p class="muted">Sessions expire after seven days.</p>
            <form method="post" action="/auth/logout">
                <button type="submit" class="danger">Sign out</button>
            </form>
        </div>"#,
        email = escape(user.map(|u| u.email.as_str()).unwrap_or("unknown")),
    );

    layout("Settings", user, &body)
}
