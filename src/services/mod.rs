// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - leaderboard aggregation, ranking and user profiles.

pub mod aggregator;
pub mod fixtures;
pub mod leaderboard;
pub mod profiles;
pub mod ranker;
pub mod resolver;

pub use aggregator::{aggregate, AggregateSet};
pub use leaderboard::{LeaderboardMirror, LeaderboardSnapshot, LeaderboardStore};
pub use profiles::{profile, profiles};
pub use ranker::{rank, Ranking};
pub use resolver::{resolve, Directory, MemoryDirectory, Resolved, TeamDirectory, UserDirectory};
