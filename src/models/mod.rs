// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod leaderboard;
pub mod reference;
pub mod user;
pub mod workout;

pub use activity::{ActivityDocument, ActivityRecord, Normalized};
pub use leaderboard::{LeaderboardEntry, UserAggregate};
pub use reference::Reference;
pub use user::{TeamRecord, UserProfile, UserRecord, UNKNOWN};
pub use workout::WorkoutRecord;
