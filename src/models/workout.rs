// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Suggested workouts.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A workout suggestion stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct WorkoutRecord {
    /// Document ID
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub activity_type: String,
    /// Beginner, Intermediate or Advanced; free-form in storage
    #[serde(default)]
    pub difficulty: String,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
    /// Estimated calories burned
    #[serde(default)]
    pub calories: u32,
    /// Newline-separated steps
    #[serde(default)]
    pub instructions: String,
}

impl WorkoutRecord {
    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.instructions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}
