// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profiles for the API, with team names resolved.

use crate::models::{TeamRecord, UserProfile, UserRecord};
use crate::services::resolver::{Directory, Resolved};

/// Build the API view of `user`, resolving its team against `teams`.
pub fn profile<D>(user: UserRecord, teams: &D) -> UserProfile
where
    D: Directory<Record = TeamRecord> + ?Sized,
{
    let display_name = user.display_name();

    let team_name = user.team_id.as_ref().and_then(|team| match team.resolve(teams) {
        Resolved::Found(record) => Some(record.name.clone()),
        Resolved::NotFound => {
            if !team.as_str().is_empty() {
                tracing::debug!(user_id = %user.id, team_id = %team, "Team reference did not resolve");
            }
            None
        }
    });

    UserProfile {
        team_id: user
            .team_id
            .map(|team| team.as_str().to_string())
            .unwrap_or_default(),
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        display_name,
        team_name,
    }
}

/// Profiles for every user, ordered by user ID.
pub fn profiles<I, D>(users: I, teams: &D) -> Vec<UserProfile>
where
    I: IntoIterator<Item = UserRecord>,
    D: Directory<Record = TeamRecord> + ?Sized,
{
    let mut profiles: Vec<UserProfile> = users.into_iter().map(|user| profile(user, teams)).collect();
    profiles.sort_by(|a, b| a.id.cmp(&b.id));
    profiles
}
