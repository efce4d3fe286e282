// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Authentication token persisted in a browser cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie holding the backend bearer token.
pub const TOKEN_COOKIE: &str = "clestiq_auth_token";

/// Token lifetime, matched by the cookie's `Max-Age`.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Reads and writes the bearer token on a [`CookieJar`].
///
/// The token is opaque; whether it is still valid is only known once the
/// backend accepts or rejects a request carrying it.
pub struct TokenStore;

impl TokenStore {
    /// Current token, if the browser sent a non-empty one.
    pub fn get(jar: &CookieJar) -> Option<String> {
        jar.get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Persist `token` for [`TOKEN_TTL_DAYS`].
    pub fn set(jar: CookieJar, token: &str, secure: bool) -> CookieJar {
        let mut cookie = base_cookie(token.to_string(), secure);
        cookie.set_max_age(time::Duration::days(TOKEN_TTL_DAYS));
        jar.add(cookie)
    }

    /// Emit a removal cookie with the same attributes used by [`TokenStore::set`].
    pub fn clear(jar: CookieJar, secure: bool) -> CookieJar {
        let mut cookie = base_cookie(String::new(), secure);
        cookie.make_removal();
        jar.add(cookie)
    }
}

fn base_cookie(value: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie
}
