// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard store.
//!
//! Holds the last published snapshot. `recompute` builds a complete new
//! snapshot off to the side and publishes it with a single atomic pointer
//! swap, so readers see either the old or the new leaderboard, never a mix.
//! Writers are serialized; readers never take a lock.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{ActivityRecord, LeaderboardEntry, TeamRecord, UserRecord};
use crate::services::aggregator::aggregate;
use crate::services::ranker::rank;
use crate::services::resolver::{Directory, TeamDirectory, UserDirectory};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// An immutable, fully built leaderboard.
#[derive(Debug, Clone)]
pub struct LeaderboardSnapshot {
    entries: Vec<LeaderboardEntry>,
    by_user: HashMap<String, usize>,
    /// 0 for the initial empty snapshot, then +1 per recompute.
    pub generation: u64,
    pub computed_at: DateTime<Utc>,
    pub normalized_records: u64,
    pub unresolved_users: usize,
    pub unresolved_teams: usize,
}

impl LeaderboardSnapshot {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            by_user: HashMap::new(),
            generation: 0,
            computed_at: DateTime::UNIX_EPOCH,
            normalized_records: 0,
            unresolved_users: 0,
            unresolved_teams: 0,
        }
    }

    /// Entries in rank order.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_by_user(&self, user_id: &str) -> Option<&LeaderboardEntry> {
        self.by_user
            .get(user_id)
            .and_then(|&idx| self.entries.get(idx))
    }
}

/// Shared holder of the current leaderboard snapshot.
pub struct LeaderboardStore {
    current: ArcSwap<LeaderboardSnapshot>,
    recompute_lock: Mutex<()>,
}

impl Default for LeaderboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(LeaderboardSnapshot::empty()),
            recompute_lock: Mutex::new(()),
        }
    }

    /// Rebuild the leaderboard from scratch and publish it.
    ///
    /// Concurrent calls queue behind each other; each one publishes a
    /// complete snapshot built from its own inputs.
    pub fn recompute<A, U, T>(&self, activities: A, users: &U, teams: &T) -> Arc<LeaderboardSnapshot>
    where
        A: IntoIterator,
        A::Item: Borrow<ActivityRecord>,
        U: Directory<Record = UserRecord> + ?Sized,
        T: Directory<Record = TeamRecord> + ?Sized,
    {
        self.publish(activities, users, teams, 0)
    }

    /// `recompute`, counting `pre_normalized` records already clamped upstream.
    fn publish<A, U, T>(
        &self,
        activities: A,
        users: &U,
        teams: &T,
        pre_normalized: u64,
    ) -> Arc<LeaderboardSnapshot>
    where
        A: IntoIterator,
        A::Item: Borrow<ActivityRecord>,
        U: Directory<Record = UserRecord> + ?Sized,
        T: Directory<Record = TeamRecord> + ?Sized,
    {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        let _guard = self
            .recompute_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let aggregates = aggregate(activities);
        let ranking = rank(&aggregates, users, teams);

        let by_user = ranking
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.user_id.clone(), idx))
            .collect();

        let generation = self.current.load().generation + 1;
        let snapshot = Arc::new(LeaderboardSnapshot {
            entries: ranking.entries,
            by_user,
            generation,
            computed_at: Utc::now(),
            normalized_records: aggregates.normalized_records.saturating_add(pre_normalized),
            unresolved_users: ranking.unresolved_users,
            unresolved_teams: ranking.unresolved_teams,
        });

        self.current.store(Arc::clone(&snapshot));

        tracing::info!(
            generation,
            entries = snapshot.len(),
            normalized_records = snapshot.normalized_records,
            unresolved_users = snapshot.unresolved_users,
            unresolved_teams = snapshot.unresolved_teams,
            "Leaderboard recomputed"
        );

        snapshot
    }

    /// The current snapshot. Holding the `Arc` pins that version.
    pub fn snapshot(&self) -> Arc<LeaderboardSnapshot> {
        self.current.load_full()
    }

    pub fn get_by_user(&self, user_id: &str) -> Option<LeaderboardEntry> {
        self.current.load().get_by_user(user_id).cloned()
    }
}

/// Load the activity log and directories from Firestore and recompute.
///
/// If loading fails the published snapshot is left untouched.
pub async fn refresh(db: &FirestoreDb, store: &LeaderboardStore) -> Result<Arc<LeaderboardSnapshot>> {
    let (documents, users, teams) =
        tokio::try_join!(db.list_activities(), db.list_users(), db.list_teams())?;

    let mut adjusted = 0u64;
    let activities: Vec<ActivityRecord> = documents
        .into_iter()
        .map(|doc| {
            let normalized = doc.normalize();
            if normalized.adjusted {
                adjusted += 1;
            }
            normalized.record
        })
        .collect();

    let users: UserDirectory = users.into_iter().collect();
    let teams: TeamDirectory = teams.into_iter().collect();

    tracing::info!(
        activities = activities.len(),
        users = users.len(),
        teams = teams.len(),
        adjusted_documents = adjusted,
        "Loaded leaderboard inputs"
    );

    Ok(store.publish(&activities, &users, &teams, adjusted))
}

/// Mirrors published snapshots into the `leaderboard` collection.
///
/// A replace is a clear followed by chunked writes, so two overlapping
/// replaces could leave rows from both snapshots. Persists run one at a
/// time, and a snapshot no newer than the last one written is skipped.
pub struct LeaderboardMirror {
    last_persisted: tokio::sync::Mutex<u64>,
}

impl Default for LeaderboardMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardMirror {
    pub fn new() -> Self {
        Self {
            last_persisted: tokio::sync::Mutex::new(0),
        }
    }

    /// Replace the stored leaderboard with `snapshot`.
    ///
    /// Returns `false` if a newer generation was already written.
    pub async fn persist(&self, db: &FirestoreDb, snapshot: &LeaderboardSnapshot) -> Result<bool> {
        self.persist_with(snapshot, |entries| db.replace_leaderboard(entries))
            .await
    }

    async fn persist_with<'a, F, Fut>(&self, snapshot: &'a LeaderboardSnapshot, write: F) -> Result<bool>
    where
        F: FnOnce(&'a [LeaderboardEntry]) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut last = self.last_persisted.lock().await;
        if snapshot.generation <= *last {
            tracing::debug!(
                generation = snapshot.generation,
                last_persisted = *last,
                "Skipping stale leaderboard persist"
            );
            return Ok(false);
        }

        write(snapshot.entries()).await?;
        *last = snapshot.generation;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reference;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    fn activity(user: &str, calories: u32) -> ActivityRecord {
        ActivityRecord {
            id: format!("{user}-{calories}"),
            user: Reference::new(user),
            activity_type: "Cycling".to_string(),
            duration_minutes: 30,
            calories,
            distance_km: Some(1.0),
            date: DateTime::UNIX_EPOCH,
            notes: None,
        }
    }

    #[test]
    fn test_starts_empty() {
        let store = LeaderboardStore::new();
        let snapshot = store.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.generation, 0);
        assert!(store.get_by_user("u1").is_none());
    }

    #[test]
    fn test_recompute_publishes_and_indexes() {
        let store = LeaderboardStore::new();
        let users = UserDirectory::default();
        let teams = TeamDirectory::default();

        store.recompute(vec![activity("u1", 100), activity("u2", 200)], &users, &teams);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.unresolved_users, 2);

        let u2 = store.get_by_user("u2").unwrap();
        assert_eq!(u2.rank, 1);
        assert_eq!(store.get_by_user("u1").unwrap().rank, 2);
        assert!(store.get_by_user("u3").is_none());
    }

    #[test]
    fn test_recompute_replaces_wholesale() {
        let store = LeaderboardStore::new();
        let users = UserDirectory::default();
        let teams = TeamDirectory::default();

        store.recompute(vec![activity("u1", 100)], &users, &teams);
        let old = store.snapshot();
        store.recompute(vec![activity("u2", 100)], &users, &teams);

        assert!(store.get_by_user("u1").is_none());
        assert!(store.get_by_user("u2").is_some());
        // A reader holding the old snapshot still sees it intact.
        assert_eq!(old.entries()[0].user_id, "u1");
        assert_eq!(store.snapshot().generation, 2);
    }

    #[test]
    fn test_idempotent_entries() {
        let store = LeaderboardStore::new();
        let users = UserDirectory::default();
        let teams = TeamDirectory::default();
        let log = vec![activity("a", 5), activity("b", 5), activity("a", 1)];

        let first = serde_json::to_vec(store.recompute(&log, &users, &teams).entries()).unwrap();
        let second = serde_json::to_vec(store.recompute(&log, &users, &teams).entries()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_readers_never_see_partial_snapshot() {
        let store = Arc::new(LeaderboardStore::new());
        let users = Arc::new(UserDirectory::default());
        let teams = Arc::new(TeamDirectory::default());
        let done = Arc::new(AtomicBool::new(false));

        let small: Vec<_> = (0..10).map(|i| activity(&format!("s{i}"), i)).collect();
        let large: Vec<_> = (0..500).map(|i| activity(&format!("l{i}"), i)).collect();

        let writer = {
            let (store, users, teams, done) = (store.clone(), users.clone(), teams.clone(), done.clone());
            thread::spawn(move || {
                for round in 0..50 {
                    let log = if round % 2 == 0 { &small } else { &large };
                    store.recompute(log, users.as_ref(), teams.as_ref());
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let (store, done) = (store.clone(), done.clone());
                thread::spawn(move || {
                    while !done.load(Ordering::SeqCst) {
                        let snapshot = store.snapshot();
                        let n = snapshot.len();
                        assert!(n == 0 || n == 10 || n == 500, "torn snapshot of {n}");
                        for (i, entry) in snapshot.entries().iter().enumerate() {
                            assert_eq!(entry.rank as usize, i + 1);
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.snapshot().generation, 50);
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let store = Arc::new(LeaderboardStore::new());
        let users = Arc::new(UserDirectory::default());
        let teams = Arc::new(TeamDirectory::default());
        let done = Arc::new(AtomicBool::new(false));

        const WRITERS: usize = 4;
        const ROUNDS: u64 = 25;
        let sizes: Vec<usize> = (1..=WRITERS).map(|w| w * 40).collect();

        let writers: Vec<_> = sizes
            .iter()
            .map(|&size| {
                let (store, users, teams) = (store.clone(), users.clone(), teams.clone());
                let log: Vec<_> = (0..size)
                    .map(|i| activity(&format!("w{size}-{i}"), i as u32))
                    .collect();
                thread::spawn(move || {
                    for _ in 0..ROUNDS {
                        store.recompute(&log, users.as_ref(), teams.as_ref());
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let (store, done, sizes) = (store.clone(), done.clone(), sizes.clone());
                thread::spawn(move || {
                    let mut last_generation = 0;
                    while !done.load(Ordering::SeqCst) {
                        let snapshot = store.snapshot();
                        let n = snapshot.len();
                        assert!(n == 0 || sizes.contains(&n), "torn snapshot of {n}");
                        assert!(snapshot.generation >= last_generation);
                        last_generation = snapshot.generation;
                        if let Some(first) = snapshot.entries().first() {
                            let prefix = format!("w{n}-");
                            assert!(snapshot
                                .entries()
                                .iter()
                                .all(|e| e.user_id.starts_with(&prefix)));
                            assert_eq!(first.rank, 1);
                        }
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);
        for reader in readers {
            reader.join().unwrap();
        }

        // Every call published exactly once.
        assert_eq!(store.snapshot().generation, WRITERS as u64 * ROUNDS);
    }

    #[test]
    fn test_overflowing_distance_stays_on_the_wire() {
        let store = LeaderboardStore::new();
        let mut log = vec![activity("u1", 10), activity("u1", 10)];
        for a in &mut log {
            a.distance_km = Some(1.7e308);
        }

        let snapshot = store.recompute(&log, &UserDirectory::default(), &TeamDirectory::default());
        let entry = &snapshot.entries()[0];
        assert_eq!(entry.total_distance, f64::MAX);

        let wire = serde_json::to_string(entry).unwrap();
        let back: LeaderboardEntry = serde_json::from_str(&wire).unwrap();
        assert_eq!(&back, entry);
    }

    fn two_generations() -> (Arc<LeaderboardSnapshot>, Arc<LeaderboardSnapshot>) {
        let store = LeaderboardStore::new();
        let users = UserDirectory::default();
        let teams = TeamDirectory::default();
        let first = store.recompute(vec![activity("u1", 10)], &users, &teams);
        let second = store.recompute(vec![activity("u2", 20)], &users, &teams);
        (first, second)
    }

    #[tokio::test]
    async fn test_mirror_skips_stale_generations() {
        let (first, second) = two_generations();
        let mirror = LeaderboardMirror::new();
        let written = Mutex::new(Vec::new());
        let record = |entries: &[LeaderboardEntry]| {
            written.lock().unwrap().push(entries[0].user_id.clone());
            async { Ok(()) }
        };

        assert!(mirror.persist_with(&second, record).await.unwrap());
        assert!(!mirror.persist_with(&first, record).await.unwrap());
        assert!(!mirror.persist_with(&second, record).await.unwrap());

        assert_eq!(*written.lock().unwrap(), ["u2"]);
    }

    #[tokio::test]
    async fn test_mirror_retries_after_failed_write() {
        let (first, _) = two_generations();
        let mirror = LeaderboardMirror::new();

        let failed = mirror
            .persist_with(&first, |_| async {
                Err(crate::error::AppError::Database("unavailable".to_string()))
            })
            .await;
        assert!(failed.is_err());

        assert!(mirror
            .persist_with(&first, |_| async { Ok(()) })
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_mirror_never_writes_initial_snapshot() {
        let store = LeaderboardStore::new();
        let mirror = LeaderboardMirror::new();
        // The offline client would fail any write it was asked to do.
        let persisted = mirror
            .persist(&FirestoreDb::new_mock(), &store.snapshot())
            .await
            .unwrap();
        assert!(!persisted);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mirror_serializes_overlapping_persists() {
        let store = LeaderboardStore::new();
        let users = UserDirectory::default();
        let teams = TeamDirectory::default();
        let snapshots: Vec<_> = (0..8)
            .map(|i| store.recompute(vec![activity(&format!("u{i}"), i)], &users, &teams))
            .collect();

        let mirror = Arc::new(LeaderboardMirror::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let written = Arc::new(Mutex::new(Vec::new()));

        // Newest first in spawn order, so older generations can arrive late.
        let tasks: Vec<_> = snapshots
            .into_iter()
            .rev()
            .map(|snapshot| {
                let (mirror, in_flight, written) = (mirror.clone(), in_flight.clone(), written.clone());
                let generation = snapshot.generation;
                tokio::spawn(async move {
                    mirror
                        .persist_with(&snapshot, move |_| async move {
                            assert_eq!(in_flight.fetch_add(1, Ordering::SeqCst), 0);
                            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                            written.lock().unwrap().push(generation);
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let written = written.lock().unwrap();
        assert!(!written.is_empty());
        assert!(written.windows(2).all(|w| w[0] < w[1]), "{written:?}");
    }
}
