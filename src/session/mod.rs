// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Session state: route classification, the session state machine, the
//! token cookie, and the advisory profile cache.
//!
//! The route gate and the session resolver both classify paths through
//! [`RouteClass::of`], so they can never disagree about where a request may go.

pub mod optimistic;
pub mod profile_cache;
pub mod token;

pub use optimistic::Optimistic;
pub use profile_cache::ProfileCache;
pub use token::TokenStore;

use crate::error::AppError;
use crate::models::User;

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const DASHBOARD_PATH: &str = "/dashboard";

const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/profile", "/settings", "/metrics", "/apps"];
const AUTH_PREFIXES: &[&str] = &[LOGIN_PATH, SIGNUP_PATH, "/login", "/signup"];

/// How a path is treated with respect to the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a token.
    Protected,
    /// Login/signup: pointless with a token.
    Auth,
    /// Everything else.
    Public,
}

impl RouteClass {
    pub fn of(path: &str) -> Self {
        if PROTECTED_PREFIXES.iter().any(|p| has_segment_prefix(path, p)) {
            RouteClass::Protected
        } else if AUTH_PREFIXES.iter().any(|p| has_segment_prefix(path, p)) {
            RouteClass::Auth
        } else {
            RouteClass::Public
        }
    }
}

/// `/apps` matches `/apps` and `/apps/1` but not `/appsfoo`.
fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Where the browser should go after a session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Login,
    Dashboard,
}

impl Navigation {
    pub fn target(self) -> Option<&'static str> {
        match self {
            Navigation::Stay => None,
            Navigation::Login => Some(LOGIN_PATH),
            Navigation::Dashboard => Some(DASHBOARD_PATH),
        }
    }
}

/// What is known about the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    /// Confirmed by the backend during this request.
    Verified(User),
    /// Backend unreachable; last known copy.
    Cached(User),
    /// Backend unreachable and nothing cached.
    Unknown,
}

impl Profile {
    pub fn user(&self) -> Option<&User> {
        match self {
            Profile::Verified(user) | Profile::Cached(user) => Some(user),
            Profile::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Resolving,
    Authenticated(Profile),
    Unauthenticated,
}

/// Session of one request, driven through explicit transitions.
#[derive(Debug, Clone)]
pub struct SessionContext {
    route: RouteClass,
    token: Option<String>,
    state: SessionState,
}

impl SessionContext {
    pub fn new(route: RouteClass) -> Self {
        Self {
            route,
            token: None,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn route(&self) -> RouteClass {
        self.route
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token for an authenticated backend call.
    pub fn bearer(&self) -> Result<&str, AppError> {
        self.token().ok_or(AppError::Unauthorized)
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(profile) => profile.user(),
            _ => None,
        }
    }

    /// True until the token has been checked at least once.
    pub fn is_loading(&self) -> bool {
        matches!(
            self.state,
            SessionState::Uninitialized | SessionState::Resolving
        )
    }

    /// Start resolution with the token read from the cookie.
    pub fn begin(&mut self, token: Option<String>) -> Navigation {
        match token {
            Some(token) => {
                self.token = Some(token);
                self.state = SessionState::Resolving;
                Navigation::Stay
            }
            None => {
                self.state = SessionState::Unauthenticated;
                self.login_if_protected()
            }
        }
    }

    /// The backend confirmed the token and returned the profile.
    pub fn profile_loaded(&mut self, user: User) -> Navigation {
        self.state = SessionState::Authenticated(Profile::Verified(user));
        if self.route == RouteClass::Auth {
            Navigation::Dashboard
        } else {
            Navigation::Stay
        }
    }

    /// Profile fetch failed. Only authorization failures end the session.
    pub fn profile_failed(&mut self, err: &AppError, cached: Option<User>) -> Navigation {
        if err.is_auth_failure() {
            self.token = None;
            self.state = SessionState::Unauthenticated;
            return self.login_if_protected();
        }

        let profile = match cached {
            Some(user) => Profile::Cached(user),
            None => Profile::Unknown,
        };
        self.state = SessionState::Authenticated(profile);
        Navigation::Stay
    }

    /// Explicit sign-in after the backend issued `token`.
    ///
    /// Without a user the profile stays unknown and is fetched on the next page.
    pub fn login(&mut self, token: String, user: Option<User>) -> Navigation {
        self.token = Some(token);
        self.state = SessionState::Authenticated(match user {
            Some(user) => Profile::Verified(user),
            None => Profile::Unknown,
        });
        Navigation::Dashboard
    }

    pub fn logout(&mut self) -> Navigation {
        self.token = None;
        self.state = SessionState::Unauthenticated;
        Navigation::Login
    }

    fn login_if_protected(&self) -> Navigation {
        if self.route == RouteClass::Protected {
            Navigation::Login
        } else {
            Navigation::Stay
        }
    }
}
