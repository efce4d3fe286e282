// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Profile and settings routes.

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Extension, Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::validation_message;
use crate::error::{AppError, Result};
use crate::models::{User, UserUpdate};
use crate::session::{Optimistic, Profile, SessionContext, SessionState};
use crate::views::account::{profile_page, settings_page};
use crate::AppState;

const PROFILE_UPDATE_FAILED: &str = "Failed to update profile.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(profile).post(update_profile))
        .route("/settings", get(settings))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 120, message = "Name must be at most 120 characters"))]
    pub full_name: String,
}

/// The profile as the page should show it, with its confirmation state.
///
/// A profile verified in this request is confirmed; otherwise the cached
/// copy keeps whatever state the last update left it in.
fn current_profile(state: &AppState, session: &SessionContext) -> Option<Optimistic<User>> {
    match session.state() {
        SessionState::Authenticated(Profile::Verified(user)) => {
            Some(Optimistic::confirmed(user.clone()))
        }
        _ => session.token().and_then(|token| state.profiles.get(token)),
    }
}

async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Html<String> {
    let profile = current_profile(&state, &session);
    let confirmed = profile.as_ref().map_or(true, Optimistic::is_confirmed);
    Html(profile_page(
        profile.as_ref().map(Optimistic::value),
        confirmed,
        None,
        None,
    ))
}

/// Apply the new name locally, then send it.
///
/// On failure the edited value stays in place, flagged unconfirmed, so the
/// user does not lose what they typed.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<ProfileForm>,
) -> Result<Html<String>> {
    let token = session.bearer()?;
    let Some(mut profile) = current_profile(&state, &session) else {
        return Err(AppError::Backend("profile unavailable".to_string()));
    };

    if let Err(errors) = form.validate() {
        let message = validation_message(&errors);
        return Ok(Html(profile_page(
            Some(profile.value()),
            profile.is_confirmed(),
            Some(&message),
            None,
        )));
    }

    let patch = UserUpdate {
        full_name: Some(form.full_name.trim().to_string()),
        email: None,
    };

    let result = profile
        .update(
            |user| user.apply(&patch),
            || state.backend.update_user(token, &patch),
        )
        .await;
    state.profiles.store(token, profile.clone());

    match result {
        Ok(()) => {
            tracing::info!("Profile updated");
            Ok(Html(profile_page(
                Some(profile.value()),
                true,
                None,
                Some("Profile updated"),
            )))
        }
        Err(err) if err.is_auth_failure() => Err(err),
        Err(err) => {
            tracing::warn!(error = %err, "Profile update failed, keeping local edit");
            let message = err
                .user_message()
                .unwrap_or_else(|| PROFILE_UPDATE_FAILED.to_string());
            Ok(Html(profile_page(
                Some(profile.value()),
                profile.is_confirmed(),
                Some(&message),
                None,
            )))
        }
    }
}

async fn settings(Extension(session): Extension<SessionContext>) -> Html<String> {
    Html(settings_page(session.user()))
}
