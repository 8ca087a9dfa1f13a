// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard API routes.
//!
//! Reads are served from the published snapshot and never touch Firestore.

use crate::error::{AppError, Result};
use crate::models::LeaderboardEntry;
use crate::services::leaderboard;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/recompute", post(recompute_leaderboard))
        .route("/api/leaderboard/{user_id}", get(get_leaderboard_entry))
}

// ─── Snapshot Listing ────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
struct LeaderboardQuery {
    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    limit: u32,
    /// Number of ranked entries to skip
    #[serde(default)]
    offset: u32,
}

fn default_limit() -> u32 {
    50
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    /// Total entries in the snapshot (not just this page)
    pub total: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub generation: u64,
    pub computed_at: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub normalized_records: u64,
}

/// Get a page of the current leaderboard.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    params.validate()?;

    let snapshot = state.leaderboard.snapshot();
    tracing::debug!(
        generation = snapshot.generation,
        limit = params.limit,
        offset = params.offset,
        "Serving leaderboard"
    );

    let entries = snapshot
        .entries()
        .iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .cloned()
        .collect();

    Ok(Json(LeaderboardResponse {
        entries,
        total: u32::try_from(snapshot.len()).unwrap_or(u32::MAX),
        generation: snapshot.generation,
        computed_at: format_utc_rfc3339(snapshot.computed_at),
        normalized_records: snapshot.normalized_records,
    }))
}

// ─── Single Entry ────────────────────────────────────────────

/// Get one user's leaderboard entry.
async fn get_leaderboard_entry(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<LeaderboardEntry>> {
    state
        .leaderboard
        .get_by_user(&user_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No leaderboard entry for user {}", user_id)))
}

// ─── Recompute ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct RecomputeResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub generation: u64,
    pub entries: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub normalized_records: u64,
    pub unresolved_users: u32,
    pub unresolved_teams: u32,
}

/// Rebuild the leaderboard from Firestore.
///
/// On a load failure the previously published snapshot keeps serving.
async fn recompute_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecomputeResponse>> {
    let snapshot = leaderboard::refresh(&state.db, &state.leaderboard).await?;

    if state.config.persist_leaderboard {
        if let Err(e) = state.mirror.persist(&state.db, &snapshot).await {
            tracing::warn!(
                error = %e,
                generation = snapshot.generation,
                "Failed to persist leaderboard snapshot"
            );
        }
    }

    let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    Ok(Json(RecomputeResponse {
        generation: snapshot.generation,
        entries: count(snapshot.len()),
        normalized_records: snapshot.normalized_records,
        unresolved_users: count(snapshot.unresolved_users),
        unresolved_teams: count(snapshot.unresolved_teams),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_limit_bounds() {
        let ok = LeaderboardQuery {
            limit: 100,
            offset: 0,
        };
        assert!(ok.validate().is_ok());

        for limit in [0, 101] {
            let bad = LeaderboardQuery { limit, offset: 0 };
            let err: AppError = bad.validate().unwrap_err().into();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }
}
