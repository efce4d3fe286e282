// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Sign-in, registration and sign-out routes.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::validation_message;
use crate::session::{RouteClass, SessionContext, TokenStore, DASHBOARD_PATH, LOGIN_PATH, SIGNUP_PATH};
use crate::views::auth::{login_page, signup_page};
use crate::AppState;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REGISTRATION_FAILED: &str = "Registration failed.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(LOGIN_PATH, get(login_form).post(login))
        .route(SIGNUP_PATH, get(signup_form).post(signup))
        .route("/auth/logout", get(logout).post(logout))
        // Legacy paths
        .route("/login", get(|| async { Redirect::permanent(LOGIN_PATH) }))
        .route("/signup", get(|| async { Redirect::permanent(SIGNUP_PATH) }))
}

#[derive(Deserialize)]
pub struct LoginParams {
    /// Set after a successful registration
    #[serde(default)]
    registered: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

async fn login_form(Query(params): Query<LoginParams>) -> Html<String> {
    let notice = params
        .registered
        .map(|_| "Account created. Please sign in.");
    Html(login_page(None, notice, ""))
}

/// Exchange credentials for a token and start the session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        let message = validation_message(&errors);
        return Html(login_page(Some(&message), None, &form.email)).into_response();
    }

    let response = match state.backend.login(&form.email, &form.password).await {
        Ok(response) => response,
        Err(err) => {
            tracing::info!(error = %err, "Login rejected");
            let message = err.user_message().unwrap_or_else(|| LOGIN_FAILED.to_string());
            return Html(login_page(Some(&message), None, &form.email)).into_response();
        }
    };

    let token = response.access_token;
    if let Some(user) = &response.user {
        state.profiles.confirm(&token, user.clone());
    } else {
        tracing::debug!("Login response carried no profile, deferring to next page load");
    }

    let mut session = SessionContext::new(RouteClass::Auth);
    let navigation = session.login(token.clone(), response.user);
    tracing::info!("User signed in");

    let jar = TokenStore::set(jar, &token, state.config.secure_cookies());
    let target = navigation.target().unwrap_or(DASHBOARD_PATH);
    (jar, Redirect::to(target)).into_response()
}

async fn signup_form() -> Html<String> {
    Html(signup_page(None, ""))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        let message = validation_message(&errors);
        return Html(signup_page(Some(&message), &form.email)).into_response();
    }

    match state.backend.register(&form.email, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Account registered");
            Redirect::to(&format!("{LOGIN_PATH}?registered=1")).into_response()
        }
        Err(err) => {
            tracing::info!(error = %err, "Registration rejected");
            let message = err
                .user_message()
                .unwrap_or_else(|| REGISTRATION_FAILED.to_string());
            Html(signup_page(Some(&message), &form.email)).into_response()
        }
    }
}

/// Drop the token and its cached profile.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let mut session = SessionContext::new(RouteClass::Public);
    session.begin(TokenStore::get(&jar));
    if let Some(token) = session.token() {
        state.profiles.evict(token);
    }

    let navigation = session.logout();
    tracing::info!("User signed out");

    let jar = TokenStore::clear(jar, state.config.secure_cookies());
    let target = navigation.target().unwrap_or(LOGIN_PATH);
    (jar, Redirect::to(target)).into_response()
}
