// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Services module - backend access and usage aggregation.

pub mod backend;
pub mod usage;

pub use backend::{BackendClient, LoginResponse};
