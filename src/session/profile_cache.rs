// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Advisory copies of user profiles, keyed by a digest of the session token.

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::User;
use crate::session::token::TOKEN_TTL_DAYS;
use crate::session::Optimistic;

#[derive(Clone)]
struct CachedProfile {
    profile: Optimistic<User>,
    stored_at: Instant,
}

/// Last known profile per session.
///
/// Used only when the backend cannot be reached; never authoritative.
#[derive(Clone)]
pub struct ProfileCache {
    entries: Arc<DashMap<String, CachedProfile>>,
    max_age: Duration,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(TOKEN_TTL_DAYS as u64 * 24 * 60 * 60))
    }
}

impl ProfileCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_age,
        }
    }

    pub fn get(&self, token: &str) -> Option<Optimistic<User>> {
        self.entries
            .get(&cache_key(token))
            .filter(|entry| entry.stored_at.elapsed() < self.max_age)
            .map(|entry| entry.profile.clone())
    }

    pub fn user(&self, token: &str) -> Option<User> {
        self.get(token).map(Optimistic::into_inner)
    }

    pub fn store(&self, token: &str, profile: Optimistic<User>) {
        let max_age = self.max_age;
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < max_age);

        self.entries.insert(
            cache_key(token),
            CachedProfile {
                profile,
                stored_at: Instant::now(),
            },
        );
    }

    /// Store a profile the backend just returned.
    pub fn confirm(&self, token: &str, user: User) {
        self.store(token, Optimistic::confirmed(user));
    }

    pub fn evict(&self, token: &str) {
        self.entries.remove(&cache_key(token));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cache_key(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
