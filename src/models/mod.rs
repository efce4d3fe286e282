// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Data models for the application.

pub mod application;
pub mod usage;
pub mod user;

pub use application::{ApiKey, Application, CreatedApiKey};
pub use usage::{AppUsage, KeyUsage, UsageReport};
pub use user::{User, UserUpdate};
