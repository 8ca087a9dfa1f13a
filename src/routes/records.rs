// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only routes for the stored records: users, teams, activities and
//! workout suggestions.

use crate::error::{AppError, Result};
use crate::models::{ActivityDocument, TeamRecord, UserProfile, WorkoutRecord};
use crate::services::{profile, profiles, TeamDirectory};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{user_id}", get(get_user))
        .route("/api/teams", get(list_teams))
        .route("/api/activities", get(list_activities))
        .route("/api/workouts", get(list_workouts))
}

/// All users, with team names resolved.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserProfile>>> {
    let (users, teams) = tokio::try_join!(state.db.list_users(), state.db.list_teams())?;
    let teams: TeamDirectory = teams.into_iter().collect();
    Ok(Json(profiles(users, &teams)))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>> {
    let (user, teams) = tokio::try_join!(state.db.get_user(&user_id), state.db.list_teams())?;
    let user = user.ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
    let teams: TeamDirectory = teams.into_iter().collect();
    Ok(Json(profile(user, &teams)))
}

async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TeamRecord>>> {
    Ok(Json(state.db.list_teams().await?))
}

#[derive(Debug, Deserialize)]
struct ActivitiesQuery {
    /// Only activities whose user reference is exactly this string
    user_id: Option<String>,
}

/// Activities, normalized, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<ActivityDocument>>> {
    let mut records: Vec<_> = state
        .db
        .list_activities()
        .await?
        .into_iter()
        .filter(|doc| params.user_id.as_deref().map_or(true, |id| id == doc.user_id))
        .map(|doc| doc.normalize().record)
        .collect();

    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    Ok(Json(records.iter().map(ActivityDocument::from).collect()))
}

async fn list_workouts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WorkoutRecord>>> {
    Ok(Json(state.db.list_workouts().await?))
}
