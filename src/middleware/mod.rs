// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Middleware modules (route gate, session resolution, security headers).

pub mod auth;
pub mod security;

pub use auth::{resolve_session, route_gate};
