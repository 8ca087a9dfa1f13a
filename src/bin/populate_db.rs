// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Seed Firestore with the superhero fixture dataset.
//!
//! Clears teams, users, activities, workouts and the stored leaderboard,
//! writes the fixtures plus a seeded random training log, then computes and
//! persists a fresh leaderboard. Set OCTOFIT_SEED to vary the training log.

use octofit_tracker::{
    config::Config,
    db::{collections, FirestoreDb},
    models::ActivityDocument,
    services::{fixtures::Fixtures, leaderboard, LeaderboardMirror, LeaderboardStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SEED: u64 = 2026;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("octofit_tracker=info".parse()?)
                .add_directive("populate_db=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env()?;
    let seed = match std::env::var("OCTOFIT_SEED") {
        Ok(raw) => raw.trim().parse::<u64>()?,
        Err(_) => DEFAULT_SEED,
    };
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    tracing::info!("Clearing existing data");
    for collection in [
        collections::LEADERBOARD,
        collections::ACTIVITIES,
        collections::USERS,
        collections::TEAMS,
        collections::WORKOUTS,
    ] {
        let removed = db.clear_collection(collection).await?;
        tracing::info!(collection, removed, "Collection cleared");
    }

    let now = chrono::Utc::now();
    let fixtures = Fixtures::superheroes(now).with_training_log(seed, now);

    for team in &fixtures.teams {
        db.upsert_team(team).await?;
    }
    tracing::info!(count = fixtures.teams.len(), "Created teams");

    for user in &fixtures.users {
        db.upsert_user(user).await?;
    }
    tracing::info!(count = fixtures.users.len(), "Created users");

    let documents: Vec<ActivityDocument> = fixtures.activities.iter().map(Into::into).collect();
    db.batch_upsert_activities(&documents).await?;
    tracing::info!(count = documents.len(), seed, "Created activities");

    for workout in &fixtures.workouts {
        db.upsert_workout(workout).await?;
        tracing::debug!(workout = %workout.name, steps = workout.steps().count(), "Created workout");
    }
    tracing::info!(count = fixtures.workouts.len(), "Created workout suggestions");

    let store = LeaderboardStore::new();
    let snapshot = leaderboard::refresh(&db, &store).await?;
    LeaderboardMirror::new().persist(&db, &snapshot).await?;

    let stored = db.list_leaderboard().await?;
    for entry in &stored {
        tracing::info!(
            rank = entry.rank,
            user = %entry.user_name,
            team = %entry.team_name,
            calories = entry.total_calories,
            "Leaderboard entry"
        );
    }

    tracing::info!(
        teams = fixtures.teams.len(),
        users = fixtures.users.len(),
        activities = documents.len(),
        workouts = fixtures.workouts.len(),
        leaderboard_entries = stored.len(),
        "Database population complete"
    );

    Ok(())
}
