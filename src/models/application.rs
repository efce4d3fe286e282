//! Tenant applications and their API keys.

use serde::{Deserialize, Serialize};

/// A tenant-registered integration that owns API keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

impl Application {
    /// Case-insensitive match on name or id (apps page search box).
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.id.to_lowercase().contains(&query)
    }
}

/// API key metadata. The full secret is never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub key_prefix: String,
    pub created_at: String,
    #[serde(default)]
    pub last_used_at: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub request_count: Option<u64>,
}

impl ApiKey {
    /// Request counter, absent counters counting as zero.
    pub fn requests(&self) -> u64 {
        self.request_count.unwrap_or(0)
    }
}

/// Response of key creation: the only time the secret is visible.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedApiKey {
    #[serde(flatten)]
    pub key: ApiKey,
    pub api_key: String,
}

impl CreatedApiKey {
    /// Split into the listable metadata and the one-time secret.
    pub fn into_parts(self) -> (ApiKey, String) {
        (self.key, self.api_key)
    }
}
