// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Login and signup screens.

use super::{bare_layout, error_banner, escape};

/// Login form. `email` is echoed back after a failed attempt.
pub fn login_page(error: Option<&str>, notice: Option<&str>, email: &str) -> String {
    let notice = notice
        .map(|msg| format!(r#"<div class="notice">{}</div>"#, escape(msg)))
        .unwrap_or_default();

    bare_layout(
        "Sign in",
        &format!(
            r#"<div class="card">
        <h1>Sign in</h1>
        <p class="muted">Access the Clestiq Shield dashboard.</p>
        {notice}
        {error}
        <form method="post" action="/auth/login">
            <label for="email">Email</label>
            <input type="email" id="email" name="email" value="{email}" required>
            <label for="password">Password</label>
            <input type="password" id="password" name="password" required>
            <button type="submit">Sign in</button>
        </form>
        <p class="muted">No account? <a href="/auth/signup">Create one</a></p>
    </div>"#,
            error = error_banner(error),
            email = escape(email),
        ),
    )
}

/// Registration form.
pub fn signup_page(error: Option<&str>, email: &str) -> String {
    bare_layout(
        "Create account",
        &format!(
            r#"<div class="card">
        <h1>Create your account</h1>
        {error}
        <form method="post" action="/auth/signup">
            <label for="email">Email</label>
            <input type="email" id="email" name="email" value="{email}" required>
            <label for="password">Password</label>
            <input type="password" id="password" name="password" required>
            <button type="submit">Sign up</button>
        </form>
        <p class="muted">Already registered? <a href="/auth/login">Sign in to your existing account</a></p>
    </div>"#,
            error = error_banner(error),
            email = escape(email),
        ),
    )
}
