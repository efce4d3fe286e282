// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Route gate and session resolution middleware.

use crate::error::SessionEnded;
use crate::session::{Navigation, RouteClass, SessionContext, TokenStore, DASHBOARD_PATH, LOGIN_PATH};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Redirect based on token presence before any page logic runs.
///
/// Only checks that a token exists; the backend decides whether it is valid.
pub async fn route_gate(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let has_token = TokenStore::get(&jar).is_some();

    match (RouteClass::of(path), has_token) {
        (RouteClass::Protected, false) => {
            tracing::debug!(path = %path, "No token, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        (RouteClass::Auth, true) => {
            tracing::debug!(path = %path, "Token present, redirecting to dashboard");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        _ => next.run(request).await,
    }
}

/// Resolve the session for a protected page and hand it to the handler.
///
/// The profile is revalidated against the backend on every page load. Only an
/// authorization failure ends the session; other failures fall back to the
/// cached profile. When the handler itself ends the session, the cached
/// profile is evicted and the token cookie removed.
pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let mut session = SessionContext::new(RouteClass::of(request.uri().path()));
    let token = TokenStore::get(&jar);

    let navigation = match session.begin(token) {
        Navigation::Stay => resolve_profile(&state, &mut session).await,
        other => other,
    };

    if let Some(target) = navigation.target() {
        let jar = if session.token().is_none() {
            TokenStore::clear(jar, state.config.secure_cookies())
        } else {
            jar
        };
        return (jar, Redirect::to(target)).into_response();
    }

    let token = session.token().map(str::to_string);
    request.extensions_mut().insert(session);
    let response = next.run(request).await;

    // A handler hit an authorization failure on a data call
    if response.extensions().get::<SessionEnded>().is_none() {
        return response;
    }
    if let Some(token) = token {
        state.profiles.evict(&token);
    }
    let jar = TokenStore::clear(CookieJar::new(), state.config.secure_cookies());
    (jar, response).into_response()
}

async fn resolve_profile(state: &AppState, session: &mut SessionContext) -> Navigation {
    let Some(token) = session.token().map(str::to_string) else {
        return Navigation::Stay;
    };

    match state.backend.current_user(&token).await {
        Ok(user) => {
            state.profiles.confirm(&token, user.clone());
            session.profile_loaded(user)
        }
        Err(err) => {
            if err.is_auth_failure() {
                tracing::info!("Session token rejected, logging out");
                state.profiles.evict(&token);
            } else {
                tracing::warn!(error = %err, "Profile fetch failed, using cached profile");
            }
            session.profile_failed(&err, state.profiles.user(&token))
        }
    }
}
