// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use octofit_tracker::config::Config;
use octofit_tracker::db::FirestoreDb;
use octofit_tracker::routes::create_router;
use octofit_tracker::services::fixtures::Fixtures;
use octofit_tracker::services::{LeaderboardMirror, LeaderboardStore, TeamDirectory, UserDirectory};
use octofit_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app with an offline database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app_with_db(FirestoreDb::new_mock())
}

/// Create a test app backed by `db`.
#[allow(dead_code)]
pub fn create_app_with_db(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        db,
        leaderboard: LeaderboardStore::new(),
        mirror: LeaderboardMirror::new(),
    });

    (create_router(state.clone()), state)
}

/// Create a test app whose leaderboard is already built from the fixtures.
#[allow(dead_code)]
pub fn create_seeded_app() -> (axum::Router, Arc<AppState>) {
    let (app, state) = create_test_app();

    let fixtures = Fixtures::superheroes(chrono::Utc::now());
    let users: UserDirectory = fixtures.users.into_iter().collect();
    let teams: TeamDirectory = fixtures.teams.into_iter().collect();
    state
        .leaderboard
        .recompute(&fixtures.activities, &users, &teams);

    (app, state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Build an empty GET request.
#[allow(dead_code)]
pub fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}
