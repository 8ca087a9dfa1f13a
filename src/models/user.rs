// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and team models for storage and API.

use crate::models::Reference;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Placeholder shown for any display field whose reference did not resolve.
pub const UNKNOWN: &str = "unknown";

/// User profile stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Document ID
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Team the user belongs to. Not guaranteed to exist.
    #[serde(default)]
    pub team_id: Option<Reference<TeamRecord>>,
}

impl UserRecord {
    /// Name shown on the leaderboard.
    ///
    /// "First Last" when either part is set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }

        let username = self.username.trim();
        if username.is_empty() {
            UNKNOWN.to_string()
        } else {
            username.to_string()
        }
    }
}

/// Team stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Document ID
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A user as returned by the API, with the team name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    /// Team reference as stored; `""` when the user has none
    pub team_id: String,
    /// `None` when the user has no team or the team does not exist
    pub team_name: Option<String>,
}
