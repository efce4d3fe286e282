//! User profile as returned by the Clestiq Shield API.

use serde::{Deserialize, Serialize};

/// Account profile (`GET /users/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    /// Account creation time (ISO 8601); older backends omit it
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Name shown in the dashboard greeting.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("User")
    }

    /// Merge a partial update into this profile.
    pub fn apply(&mut self, patch: &UserUpdate) {
        if let Some(full_name) = &patch.full_name {
            self.full_name = Some(full_name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
    }
}

/// Partial profile update (`PATCH /users/`). Absent fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
