// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OctoFit Tracker: team fitness leaderboard backend
//!
//! This crate derives per-user totals from the activity log, ranks users
//! into a leaderboard, and serves the last published snapshot over HTTP
//! alongside read-only views of the stored users, teams, activities and
//! workout suggestions.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{LeaderboardMirror, LeaderboardStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub leaderboard: LeaderboardStore,
    /// Serializes writes of published snapshots to Firestore
    pub mirror: LeaderboardMirror,
}
