// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Sign-in, registration and token cookie attribute tests.

use axum::http::StatusCode;
use clestiq_webplatform::{config::Config, routes::create_router, AppState};
use std::sync::Arc;

mod common;
use common::{
    body_string, get_page, location, post_form, set_cookie_headers, spawn_backend, FakeState,
    TOKEN,
};

fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

const LOGIN_BODY: &str = "email=ada%40example.com&password=correct-horse";

#[tokio::test]
async fn test_login_sets_token_cookie() {
    let backend = spawn_backend(FakeState::default()).await;
    let (app, state) = common::create_test_app(&backend);

    let response = post_form(&app, "/auth/login", None, LOGIN_BODY).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let cookie = find_cookie(&set_cookie_headers(&response), "clestiq_auth_token");
    assert!(cookie.starts_with(&format!("clestiq_auth_token={TOKEN}")));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(!cookie.contains("Secure"));

    // Profile from the login response is cached
    assert_eq!(state.profiles.len(), 1);
    assert_eq!(
        state.profiles.user(TOKEN).map(|u| u.email),
        Some("ada@example.com".to_string())
    );
}

#[tokio::test]
async fn test_login_without_user_is_token_only() {
    let backend = spawn_backend(FakeState {
        login_includes_user: false,
        ..FakeState::default()
    })
    .await;
    let (app, state) = common::create_test_app(&backend);

    let response = post_form(&app, "/auth/login", None, LOGIN_BODY).await;
    assert_eq!(location(&response), "/dashboard");
    find_cookie(&set_cookie_headers(&response), "clestiq_auth_token");
    assert!(state.profiles.is_empty());

    // The profile is fetched by the next page
    let response = get_page(&app, "/dashboard", Some(TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Ada Lovelace"));
    assert_eq!(backend.count("GET /api/v1/users/"), 1);
}

#[tokio::test]
async fn test_login_failure_rerenders_with_backend_detail() {
    let backend = spawn_backend(FakeState::default()).await;
    let (app, _) = common::create_test_app(&backend);

    let response = post_form(
        &app,
        "/auth/login",
        None,
        "email=ada%40example.com&password=wrong",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie_headers(&response).is_empty());

    let body = body_string(response).await;
    assert!(body.contains("Incorrect email or password"));
    assert!(body.contains(r#"value="ada@example.com""#));
}

#[tokio::test]
async fn test_login_form_validation_skips_backend() {
    let backend = spawn_backend(FakeState::default()).await;
    let (app, _) = common::create_test_app(&backend);

    let response = post_form(&app, "/auth/login", None, "email=not-an-email&password=").await;
    let body = body_string(response).await;
    assert!(body.contains("Enter a valid email address"));
    assert!(body.contains("Password is required"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_secure_cookie_when_served_over_https() {
    let backend = spawn_backend(FakeState::default()).await;
    let config = Config {
        api_base_url: backend.base_url.clone(),
        public_url: "https://dashboard.example.com".to_string(),
        ..Config::test_default()
    };
    let app = create_router(Arc::new(AppState::new(config).unwrap()));

    let response = post_form(&app, "/auth/login", None, LOGIN_BODY).await;
    let cookie = find_cookie(&set_cookie_headers(&response), "clestiq_auth_token");
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_logout_clears_cookie_and_cache() {
    let backend = spawn_backend(FakeState::default()).await;
    let (app, state) = common::create_test_app(&backend);

    post_form(&app, "/auth/login", None, LOGIN_BODY).await;
    assert_eq!(state.profiles.len(), 1);

    let response = post_form(&app, "/auth/logout", Some(TOKEN), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    let cookie = find_cookie(&set_cookie_headers(&response), "clestiq_auth_token");
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
    assert!(state.profiles.is_empty());
}

#[tokio::test]
async fn test_signup_redirects_to_login_with_notice() {
    let backend = spawn_backend(FakeState::default()).await;
    let (app, _) = common::create_test_app(&backend);

    let response = post_form(
        &app,
        "/auth/signup",
        None,
        "email=grace%40example.com&password=long-enough",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?registered=1");

    let response = get_page(&app, "/auth/login?registered=1", None).await;
    assert!(body_string(response).await.contains("Account created"));
}

#[tokio::test]
async fn test_signup_failure_shows_backend_detail() {
    let backend = spawn_backend(FakeState::default()).await;
    let (app, _) = common::create_test_app(&backend);

    let response = post_form(
        &app,
        "/auth/signup",
        None,
        "email=ada%40example.com&password=long-enough",
    )
    .await;
    assert!(body_string(response).await.contains("Email already registered"));

    let response = post_form(
        &app,
        "/auth/signup",
        None,
        "email=grace%40example.com&password=short",
    )
    .await;
    assert!(body_string(response)
        .await
        .contains("body -&gt; password: too short"));
}

#[tokio::test]
async fn test_session_end_removal_cookie_matches_secure_flag() {
    let backend = spawn_backend(FakeState::default()).await;
    let config = Config {
        api_base_url: backend.base_url.clone(),
        public_url: "https://dashboard.example.com".to_string(),
        ..Config::test_default()
    };
    let app = create_router(Arc::new(AppState::new(config).unwrap()));

    // Profile check fails transiently, then the apps call rejects the token
    backend.update(|s| {
        s.users_status = Some(StatusCode::BAD_GATEWAY);
        s.token = "rotated".to_string();
    });

    let response = get_page(&app, "/apps", Some(TOKEN)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    let cookie = find_cookie(&set_cookie_headers(&response), "clestiq_auth_token");
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
}
