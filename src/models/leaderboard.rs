// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived leaderboard models.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Totals for one user reference, derived from the activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAggregate {
    pub user_id: String,
    pub total_calories: u64,
    pub total_activities: u64,
    /// Total distance in km, rounded to 2 decimal places.
    pub total_distance: f64,
}

/// One ranked row of the leaderboard.
///
/// `team_id` is `None` when the user has no team (or did not resolve);
/// `Some` with an `"unknown"` team name means the team reference dangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub user_name: String,
    #[serde(
        serialize_with = "serialize_team_id",
        deserialize_with = "deserialize_team_id",
        default
    )]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub team_id: Option<String>,
    pub team_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_activities: u64,
    pub total_distance: f64,
}

/// Identifiers always go over the wire as plain strings; no team is `""`.
fn serialize_team_id<S: Serializer>(team_id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(team_id.as_deref().unwrap_or(""))
}

fn deserialize_team_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_empty()))
}

/// Round a distance to 2 decimal places.
///
/// Values too large to scale have no fractional part and pass through.
pub fn round_distance(km: f64) -> f64 {
    let scaled = km * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        km
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let entry = LeaderboardEntry {
            rank: 1,
            user_id: "u1".to_string(),
            user_name: "Tony Stark".to_string(),
            team_id: None,
            team_name: "unknown".to_string(),
            total_calories: 500,
            total_activities: 2,
            total_distance: 5.25,
        };

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "rank": 1,
                "user_id": "u1",
                "user_name": "Tony Stark",
                "team_id": "",
                "team_name": "unknown",
                "total_calories": 500,
                "total_activities": 2,
                "total_distance": 5.25,
            })
        );
    }

    #[test]
    fn test_round_distance() {
        assert_eq!(round_distance(10.004), 10.0);
        assert_eq!(round_distance(10.006), 10.01);
        assert_eq!(round_distance(0.0), 0.0);
        assert_eq!(round_distance(f64::MAX), f64::MAX);
    }

    #[test]
    fn test_saturated_distance_round_trips() {
        let entry = LeaderboardEntry {
            rank: 1,
            user_id: "u1".to_string(),
            user_name: "Barry Allen".to_string(),
            team_id: Some("team-dc".to_string()),
            team_name: "Team DC".to_string(),
            total_calories: 1,
            total_activities: 2,
            total_distance: round_distance(f64::MAX),
        };

        let wire = serde_json::to_string(&entry).unwrap();
        assert!(!wire.contains("null"), "{wire}");
        let back: LeaderboardEntry = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, entry);
    }
}
