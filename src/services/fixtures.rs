// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deterministic seed dataset used by `populate_db` and the tests.
//!
//! Two teams of five heroes, one activity each. The dataset also carries one
//! activity for a user that does not exist and one user whose team does not
//! exist, so a freshly seeded database exercises both dangling-reference
//! paths. `with_training_log` adds a seeded batch of random sessions on top.

use crate::models::leaderboard::round_distance;
use crate::models::{ActivityRecord, Reference, TeamRecord, UserRecord, WorkoutRecord};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const TEAM_MARVEL: &str = "team-marvel";
pub const TEAM_DC: &str = "team-dc";
/// Activity owner that has no user document.
pub const GHOST_USER: &str = "user-deleted-hero";
/// Team reference that has no team document.
pub const GHOST_TEAM: &str = "team-disbanded";

/// Hero: (user id, username, first, last, team)
const HEROES: [(&str, &str, &str, &str, &str); 11] = [
    ("user-tony-stark", "ironman", "Tony", "Stark", TEAM_MARVEL),
    ("user-steve-rogers", "capamerica", "Steve", "Rogers", TEAM_MARVEL),
    ("user-natasha-romanoff", "blackwidow", "Natasha", "Romanoff", TEAM_MARVEL),
    ("user-thor-odinson", "thor", "Thor", "Odinson", TEAM_MARVEL),
    ("user-bruce-banner", "hulk", "Bruce", "Banner", TEAM_MARVEL),
    ("user-bruce-wayne", "batman", "Bruce", "Wayne", TEAM_DC),
    ("user-clark-kent", "superman", "Clark", "Kent", TEAM_DC),
    ("user-diana-prince", "wonderwoman", "Diana", "Prince", TEAM_DC),
    ("user-barry-allen", "flash", "Barry", "Allen", TEAM_DC),
    ("user-arthur-curry", "aquaman", "Arthur", "Curry", TEAM_DC),
    ("user-peter-parker", "spiderman", "Peter", "Parker", GHOST_TEAM),
];

/// Activity: (user id, kind, minutes, calories, km, notes)
const ACTIVITIES: [(&str, &str, u32, u32, f64, &str); 12] = [
    ("user-tony-stark", "Weightlifting", 60, 400, 0.0, "Building the next suit requires strength"),
    ("user-steve-rogers", "Running", 45, 500, 10.0, "Morning run around the base"),
    ("user-natasha-romanoff", "Boxing", 50, 450, 0.0, "Sparring session"),
    ("user-thor-odinson", "Weightlifting", 90, 800, 0.0, "Lifting heavy objects"),
    ("user-bruce-banner", "HIIT", 30, 600, 0.0, "Smash training session"),
    ("user-bruce-wayne", "Boxing", 70, 600, 0.0, "Cave training"),
    ("user-clark-kent", "Running", 20, 300, 50.0, "Quick loop around the city"),
    ("user-diana-prince", "Weightlifting", 55, 500, 0.0, "Island training routine"),
    ("user-barry-allen", "Running", 15, 700, 100.0, "Sprint"),
    ("user-arthur-curry", "Swimming", 60, 550, 20.0, "Patrolling the coast"),
    ("user-peter-parker", "Cycling", 35, 320, 12.25, "Swinging between buildings"),
    (GHOST_USER, "Cycling", 40, 350, 15.5, "Logged before the account was removed"),
];

const ACTIVITY_TYPES: [&str; 7] = [
    "Running",
    "Weightlifting",
    "Swimming",
    "Cycling",
    "Boxing",
    "Yoga",
    "HIIT",
];

/// Kinds that cover ground; everything else logs no distance.
const DISTANCE_TYPES: [&str; 3] = ["Running", "Cycling", "Swimming"];

/// Workout: (id, name, description, kind, difficulty, minutes, calories, steps)
#[allow(clippy::type_complexity)]
const WORKOUTS: [(&str, &str, &str, &str, &str, u32, u32, &str); 10] = [
    (
        "workout-arc-reactor-core",
        "Arc Reactor Core",
        "Build an iron core",
        "Weightlifting",
        "Advanced",
        45,
        400,
        "1. Warm-up: 5 min\n2. Bench press: 4x10\n3. Deadlifts: 4x8\n4. Core exercises: 3x15\n5. Cool down: 5 min",
    ),
    (
        "workout-super-soldier-stamina",
        "Super Soldier Stamina",
        "Endurance intervals",
        "Running",
        "Intermediate",
        40,
        450,
        "1. Warm-up jog: 5 min\n2. Interval sprints: 10x1 min\n3. Steady pace run: 15 min\n4. Cool down walk: 5 min",
    ),
    (
        "workout-widows-web",
        "Widow's Web Workout",
        "Agility and footwork",
        "Boxing",
        "Advanced",
        50,
        500,
        "1. Shadow boxing: 10 min\n2. Heavy bag: 5x3 min rounds\n3. Speed bag: 10 min\n4. Stretching: 10 min",
    ),
    (
        "workout-mjolnir-might",
        "Mjolnir Might",
        "Heavy compound strength",
        "Weightlifting",
        "Advanced",
        60,
        600,
        "1. Warm-up: 10 min\n2. Squats: 5x5\n3. Overhead press: 4x8\n4. Pull-ups: 4x10\n5. Hammer curls: 3x12",
    ),
    (
        "workout-gamma-smash",
        "Gamma Smash Session",
        "High-intensity intervals",
        "HIIT",
        "Advanced",
        30,
        550,
        "1. Warm-up: 5 min\n2. Burpees: 4x20\n3. Jump squats: 4x15\n4. Mountain climbers: 4x30 sec\n5. Cool down: 5 min",
    ),
    (
        "workout-dark-knight-discipline",
        "Dark Knight Discipline",
        "Martial arts conditioning",
        "Boxing",
        "Advanced",
        60,
        550,
        "1. Warm-up: 10 min\n2. Martial arts combos: 15 min\n3. Heavy bag work: 20 min\n4. Core training: 10 min\n5. Flexibility: 5 min",
    ),
    (
        "workout-man-of-steel-marathon",
        "Man of Steel Marathon",
        "Long-distance endurance",
        "Running",
        "Intermediate",
        50,
        500,
        "1. Warm-up: 10 min\n2. Long distance run: 35 min\n3. Sprint finish: 2 min\n4. Cool down: 3 min",
    ),
    (
        "workout-amazon-warrior",
        "Amazon Warrior Workout",
        "Full-body strength",
        "Weightlifting",
        "Intermediate",
        50,
        450,
        "1. Warm-up: 5 min\n2. Lunges: 3x12 each leg\n3. Rows: 4x10\n4. Shoulder press: 4x10\n5. Planks: 3x1 min",
    ),
    (
        "workout-speed-force-sprint",
        "Speed Force Sprint",
        "Fast cardio intervals",
        "Running",
        "Advanced",
        30,
        600,
        "1. Dynamic warm-up: 5 min\n2. Sprint intervals: 15x30 sec\n3. Recovery jog between: 30 sec\n4. Cool down: 5 min",
    ),
    (
        "workout-atlantean-aquatics",
        "Atlantean Aquatics",
        "Mixed-stroke swim",
        "Swimming",
        "Intermediate",
        45,
        500,
        "1. Warm-up swim: 10 min\n2. Freestyle laps: 20 min\n3. Backstroke: 10 min\n4. Cool down: 5 min",
    ),
];

/// A complete seed dataset.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub teams: Vec<TeamRecord>,
    pub users: Vec<UserRecord>,
    pub activities: Vec<ActivityRecord>,
    pub workouts: Vec<WorkoutRecord>,
}

impl Fixtures {
    /// The superhero dataset, with activity dates counting back from `now`.
    pub fn superheroes(now: DateTime<Utc>) -> Self {
        let teams = vec![
            TeamRecord {
                id: TEAM_MARVEL.to_string(),
                name: "Team Marvel".to_string(),
                description: "The mightiest heroes unite for fitness.".to_string(),
            },
            TeamRecord {
                id: TEAM_DC.to_string(),
                name: "Team DC".to_string(),
                description: "Protecting the world through strength and fitness.".to_string(),
            },
        ];

        let users = HEROES
            .iter()
            .map(|&(id, username, first, last, team)| UserRecord {
                id: id.to_string(),
                username: username.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: Some(format!("{username}@octofit.example")),
                team_id: Some(Reference::new(team)),
            })
            .collect();

        let activities = ACTIVITIES
            .iter()
            .zip(0i64..)
            .map(|(&(user, kind, minutes, calories, km, notes), day)| ActivityRecord {
                id: format!("activity-{:03}", day + 1),
                user: Reference::new(user),
                activity_type: kind.to_string(),
                duration_minutes: minutes,
                calories,
                distance_km: (km > 0.0).then_some(km),
                date: now - Duration::days(day),
                notes: Some(notes.to_string()),
            })
            .collect();

        let workouts = WORKOUTS
            .iter()
            .map(
                |&(id, name, description, kind, difficulty, minutes, calories, steps)| WorkoutRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    activity_type: kind.to_string(),
                    difficulty: difficulty.to_string(),
                    duration: minutes,
                    calories,
                    instructions: steps.to_string(),
                },
            )
            .collect();

        Self {
            teams,
            users,
            activities,
            workouts,
        }
    }

    /// Add 3 to 7 random sessions per user from the last 30 days.
    ///
    /// The same `seed` always produces the same sessions.
    pub fn with_training_log(mut self, seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut next_id = self.activities.len() + 1;

        for user in &self.users {
            for _ in 0..rng.random_range(3..=7) {
                let kind = ACTIVITY_TYPES[rng.random_range(0..ACTIVITY_TYPES.len())];
                let duration_minutes = rng.random_range(20..=90);
                let calories = rng.random_range(200..=800);
                let distance_km = DISTANCE_TYPES
                    .contains(&kind)
                    .then(|| round_distance(rng.random_range(0.0..20.0)));
                let days_ago = rng.random_range(0..=30);

                self.activities.push(ActivityRecord {
                    id: format!("activity-{:03}", next_id),
                    user: Reference::new(user.id.clone()),
                    activity_type: kind.to_string(),
                    duration_minutes,
                    calories,
                    distance_km,
                    date: now - Duration::days(days_ago),
                    notes: None,
                });
                next_id += 1;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN;
    use crate::services::aggregator::aggregate;
    use crate::services::ranker::rank;
    use crate::services::resolver::{TeamDirectory, UserDirectory};

    fn ranked() -> Vec<crate::models::LeaderboardEntry> {
        let fixtures = Fixtures::superheroes(DateTime::UNIX_EPOCH);
        let users: UserDirectory = fixtures.users.into_iter().collect();
        let teams: TeamDirectory = fixtures.teams.into_iter().collect();
        rank(&aggregate(&fixtures.activities), &users, &teams).entries
    }

    #[test]
    fn test_dataset_shape() {
        let fixtures = Fixtures::superheroes(DateTime::UNIX_EPOCH);
        assert_eq!(fixtures.teams.len(), 2);
        assert_eq!(fixtures.users.len(), 11);
        assert_eq!(fixtures.activities.len(), 12);
        assert_eq!(fixtures.workouts.len(), 10);
        assert!(fixtures.workouts.iter().all(|w| w.steps().count() >= 4));
    }

    #[test]
    fn test_training_log_is_reproducible() {
        let base = Fixtures::superheroes(DateTime::UNIX_EPOCH);
        let a = base.clone().with_training_log(7, DateTime::UNIX_EPOCH);
        let b = base.clone().with_training_log(7, DateTime::UNIX_EPOCH);
        let c = base.with_training_log(8, DateTime::UNIX_EPOCH);

        assert_eq!(a.activities, b.activities);
        assert_ne!(a.activities, c.activities);
    }

    #[test]
    fn test_training_log_shape() {
        let now = DateTime::UNIX_EPOCH + Duration::days(365);
        let fixtures = Fixtures::superheroes(now).with_training_log(2026, now);
        let extra = &fixtures.activities[12..];

        for user in &fixtures.users {
            let sessions = extra.iter().filter(|a| a.user.as_str() == user.id).count();
            assert!((3..=7).contains(&sessions), "{}: {sessions}", user.id);
        }

        for activity in extra {
            assert!((20..=90).contains(&activity.duration_minutes));
            assert!((200..=800).contains(&activity.calories));
            assert!(activity.date <= now && activity.date >= now - Duration::days(30));
            if let Some(km) = activity.distance_km {
                assert!(DISTANCE_TYPES.contains(&activity.activity_type.as_str()));
                assert!((0.0..=20.0).contains(&km));
            }
        }

        let ids: std::collections::HashSet<_> =
            fixtures.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), fixtures.activities.len());

        // Still one leaderboard entry per distinct user reference.
        let users: UserDirectory = fixtures.users.into_iter().collect();
        let teams: TeamDirectory = fixtures.teams.into_iter().collect();
        assert_eq!(rank(&aggregate(&fixtures.activities), &users, &teams).entries.len(), 12);
    }

    #[test]
    fn test_seeded_ranking() {
        let entries = ranked();
        let top: Vec<_> = entries.iter().take(4).map(|e| e.user_name.as_str()).collect();
        // Hulk and Batman tie on calories, distance and count; ID decides.
        assert_eq!(top, ["Thor Odinson", "Barry Allen", "Bruce Banner", "Bruce Wayne"]);
        assert_eq!(entries.len(), 12);
    }

    #[test]
    fn test_seeded_dangling_references() {
        let entries = ranked();

        let ghost = entries.iter().find(|e| e.user_id == GHOST_USER).unwrap();
        assert_eq!(ghost.user_name, UNKNOWN);
        assert_eq!(ghost.total_distance, 15.5);

        let spidey = entries
            .iter()
            .find(|e| e.user_id == "user-peter-parker")
            .unwrap();
        assert_eq!(spidey.team_id.as_deref(), Some(GHOST_TEAM));
        assert_eq!(spidey.team_name, UNKNOWN);
    }
}
