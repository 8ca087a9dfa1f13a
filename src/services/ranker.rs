// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ranking.
//!
//! Joins aggregates against the user and team directories and orders them
//! by calories (descending), then distance (descending), then activity
//! count (descending), then user ID (ascending). Ranks follow position, so
//! tied entries still get distinct ranks.

use crate::models::{LeaderboardEntry, TeamRecord, UserAggregate, UserRecord, UNKNOWN};
use crate::services::aggregator::AggregateSet;
use crate::services::resolver::{resolve, Directory, Resolved};
use std::cmp::Ordering;

/// Ranked entries plus how many references failed to resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub entries: Vec<LeaderboardEntry>,
    pub unresolved_users: usize,
    pub unresolved_teams: usize,
}

/// Build the ordered leaderboard for `aggregates`.
pub fn rank<U, T>(aggregates: &AggregateSet, users: &U, teams: &T) -> Ranking
where
    U: Directory<Record = UserRecord> + ?Sized,
    T: Directory<Record = TeamRecord> + ?Sized,
{
    let mut unresolved_users = 0;
    let mut unresolved_teams = 0;

    let mut entries: Vec<LeaderboardEntry> = aggregates
        .iter()
        .map(|aggregate| {
            let (user_name, team_id, team_name) = match resolve(users, &aggregate.user_id) {
                Resolved::Found(user) => {
                    let (team_id, team_name) = match &user.team_id {
                        Some(team_ref) if !team_ref.as_str().is_empty() => {
                            let name = match team_ref.resolve(teams) {
                                Resolved::Found(team) => team.name.clone(),
                                Resolved::NotFound => {
                                    unresolved_teams += 1;
                                    tracing::debug!(
                                        user_id = %aggregate.user_id,
                                        team_id = %team_ref,
                                        "Team reference did not resolve"
                                    );
                                    UNKNOWN.to_string()
                                }
                            };
                            (Some(team_ref.as_str().to_string()), name)
                        }
                        _ => (None, UNKNOWN.to_string()),
                    };
                    (user.display_name(), team_id, team_name)
                }
                Resolved::NotFound => {
                    unresolved_users += 1;
                    tracing::debug!(
                        user_id = %aggregate.user_id,
                        "User reference did not resolve"
                    );
                    (UNKNOWN.to_string(), None, UNKNOWN.to_string())
                }
            };

            entry_for(aggregate, user_name, team_id, team_name)
        })
        .collect();

    entries.sort_by(compare_entries);

    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }

    Ranking {
        entries,
        unresolved_users,
        unresolved_teams,
    }
}

fn entry_for(
    aggregate: &UserAggregate,
    user_name: String,
    team_id: Option<String>,
    team_name: String,
) -> LeaderboardEntry {
    LeaderboardEntry {
        rank: 0,
        user_id: aggregate.user_id.clone(),
        user_name,
        team_id,
        team_name,
        total_calories: aggregate.total_calories,
        total_activities: aggregate.total_activities,
        total_distance: aggregate.total_distance,
    }
}

/// Total order used for ranking; `Less` means `a` ranks above `b`.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_calories
        .cmp(&a.total_calories)
        .then_with(|| b.total_distance.total_cmp(&a.total_distance))
        .then_with(|| b.total_activities.cmp(&a.total_activities))
        .then_with(|| a.user_id.cmp(&b.user_id))
}
