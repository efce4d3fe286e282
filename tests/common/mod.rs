// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Shared fixtures: an in-process fake of the Clestiq Shield REST API and
//! helpers for driving the dashboard router.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use clestiq_webplatform::config::Config;
use clestiq_webplatform::routes::create_router;
use clestiq_webplatform::AppState;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TOKEN: &str = "test-token";
pub const PASSWORD: &str = "correct-horse";

/// Mutable state of the fake backend.
pub struct FakeState {
    pub token: String,
    pub user: Value,
    /// Whether `POST /auth/login` includes the user object
    pub login_includes_user: bool,
    /// Forced status for `GET /users/`
    pub users_status: Option<StatusCode>,
    /// Forced status for `PATCH /users/`
    pub update_status: Option<StatusCode>,
    /// Forced status for `GET /apps/{id}/keys`
    pub keys_status: Option<StatusCode>,
    /// Forced status for `DELETE /apps/{id}`
    pub delete_status: Option<StatusCode>,
    pub apps: Vec<Value>,
    pub keys: HashMap<String, Vec<Value>>,
    /// `METHOD /path` of every request received, in order
    pub calls: Vec<String>,
    pub next_id: u32,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            token: TOKEN.to_string(),
            user: json!({
                "id": "u1",
                "email": "ada@example.com",
                "full_name": "Ada Lovelace",
                "is_active": true,
                "created_at": "2026-01-05T10:00:00Z"
            }),
            login_includes_user: true,
            users_status: None,
            update_status: None,
            keys_status: None,
            delete_status: None,
            apps: Vec::new(),
            keys: HashMap::new(),
            calls: Vec::new(),
            next_id: 1,
        }
    }
}

impl FakeState {
    pub fn with_app(mut self, id: &str, name: &str, created_at: &str) -> Self {
        self.apps.push(json!({
            "id": id,
            "name": name,
            "description": null,
            "created_at": created_at
        }));
        self
    }

    pub fn with_key(mut self, app_id: &str, key_id: &str, active: bool, requests: u64) -> Self {
        self.keys.entry(app_id.to_string()).or_default().push(json!({
            "id": key_id,
            "name": format!("key {key_id}"),
            "key_prefix": format!("sk_{key_id}"),
            "created_at": "2026-01-06T10:00:00Z",
            "last_used_at": null,
            "is_active": active,
            "request_count": requests
        }));
        self
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }
}

type Shared = Arc<Mutex<FakeState>>;

/// Running fake backend.
pub struct FakeBackend {
    pub state: Shared,
    pub base_url: String,
}

impl FakeBackend {
    /// Requests received so far.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }
}

/// Serve `state` on an ephemeral port under `/api/v1`.
pub async fn spawn_backend(state: FakeState) -> FakeBackend {
    let shared: Shared = Arc::new(Mutex::new(state));

    let api = Router::new()
        .route("/auth/login", post(fake_login))
        .route("/auth/register", post(fake_register))
        .route("/users/", get(fake_current_user).patch(fake_update_user))
        .route("/apps/", get(fake_list_apps).post(fake_create_app))
        .route("/apps/{id}", get(fake_get_app).delete(fake_delete_app))
        .route("/apps/{id}/keys", get(fake_list_keys).post(fake_create_key))
        .route("/apps/{id}/keys/{key_id}", delete(fake_revoke_key));

    let app = Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(shared.clone(), record_call))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });

    FakeBackend {
        state: shared,
        base_url: format!("http://{addr}/api/v1"),
    }
}

/// Create the dashboard router talking to `backend`.
pub fn create_test_app(backend: &FakeBackend) -> (Router, Arc<AppState>) {
    let config = Config {
        api_base_url: backend.base_url.clone(),
        ..Config::test_default()
    };
    let state = Arc::new(AppState::new(config).expect("app state"));
    (create_router(state.clone()), state)
}

// ─── Request helpers ─────────────────────────────────────────────

pub async fn get_page(app: &Router, path: &str, token: Option<&str>) -> Response {
    let mut request = Request::builder().uri(path);
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("clestiq_auth_token={token}"));
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: &Router, path: &str, token: Option<&str>, body: &str) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("clestiq_auth_token={token}"));
    }
    app.clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

// ─── Fake backend handlers ───────────────────────────────────────

async fn record_call(State(state): State<Shared>, request: Request<Body>, next: Next) -> Response {
    let call = format!("{} {}", request.method(), request.uri().path());
    state.lock().unwrap().calls.push(call);
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authorize(state: &FakeState, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", state.token);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn fake_login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    let state = state.lock().unwrap();
    if form.password != PASSWORD || state.user["email"] != form.username.as_str() {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }

    let mut body = json!({ "access_token": state.token, "token_type": "bearer" });
    if state.login_includes_user {
        body["user"] = state.user.clone();
    }
    Json(body).into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
}

async fn fake_register(State(state): State<Shared>, Json(body): Json<RegisterBody>) -> Response {
    let mut state = state.lock().unwrap();
    if state.user["email"] == body.email.as_str() {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    if body.password.len() < 8 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "password"], "msg": "too short" }] })),
        )
            .into_response();
    }

    let id = state.next_id("u");
    Json(json!({ "id": id, "email": body.email, "is_active": true })).into_response()
}

async fn fake_current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Some(status) = state.users_status {
        return detail(status, "forced failure");
    }
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    Json(state.user.clone()).into_response()
}

async fn fake_update_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    if let Some(status) = state.update_status {
        return detail(status, "update unavailable");
    }
    if let Some(name) = patch.get("full_name") {
        state.user["full_name"] = name.clone();
    }
    Json(state.user.clone()).into_response()
}

async fn fake_list_apps(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    Json(state.apps.clone()).into_response()
}

async fn fake_create_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let id = state.next_id("app");
    let app = json!({
        "id": id,
        "name": body["name"],
        "description": null,
        "created_at": "2026-03-01T00:00:00Z"
    });
    state.apps.push(app.clone());
    Json(app).into_response()
}

fn find_app(state: &FakeState, id: &str) -> Option<Value> {
    state.apps.iter().find(|a| a["id"] == id).cloned()
}

async fn fake_get_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    match find_app(&state, &id) {
        Some(app) => Json(app).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Application not found"),
    }
}

async fn fake_delete_app(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    if let Some(status) = state.delete_status {
        return detail(status, "cannot delete");
    }
    state.apps.retain(|a| a["id"] != id.as_str());
    StatusCode::NO_CONTENT.into_response()
}

async fn fake_list_keys(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    if let Some(status) = state.keys_status {
        return detail(status, "keys unavailable");
    }
    Json(state.keys.get(&id).cloned().unwrap_or_default()).into_response()
}

async fn fake_create_key(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let key_id = state.next_id("key");
    let key = json!({
        "id": key_id,
        "name": body["name"],
        "key_prefix": format!("sk_{key_id}"),
        "created_at": "2026-03-02T00:00:00Z",
        "last_used_at": null,
        "is_active": true,
        "request_count": 0
    });
    state.keys.entry(id).or_default().push(key.clone());

    let mut created = key;
    created["api_key"] = json!(format!("sk_{key_id}_SECRETVALUE"));
    Json(created).into_response()
}

async fn fake_revoke_key(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((id, key_id)): Path<(String, String)>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    if let Some(keys) = state.keys.get_mut(&id) {
        keys.retain(|k| k["id"] != key_id.as_str());
    }
    StatusCode::NO_CONTENT.into_response()
}
