// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OctoFit Tracker API Server
//!
//! Serves the team fitness leaderboard computed from the Firestore activity
//! log.

use octofit_tracker::{
    config::Config,
    db::FirestoreDb,
    services::{leaderboard, LeaderboardMirror, LeaderboardStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting OctoFit Tracker API");

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        leaderboard: LeaderboardStore::new(),
        mirror: LeaderboardMirror::new(),
    });

    // An empty leaderboard is still servable, so a failed initial load is
    // not fatal; POST /api/leaderboard/recompute can retry later.
    if config.recompute_on_startup {
        match leaderboard::refresh(&state.db, &state.leaderboard).await {
            Ok(snapshot) => {
                tracing::info!(entries = snapshot.len(), "Initial leaderboard built");
                if config.persist_leaderboard {
                    if let Err(e) = state.mirror.persist(&state.db, &snapshot).await {
                        tracing::warn!(error = %e, "Failed to persist initial leaderboard");
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "Initial leaderboard build failed"),
        }
    }

    let app = octofit_tracker::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), tracing_subscriber::filter::ParseError> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("octofit_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
