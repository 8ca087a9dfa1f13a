// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Teams and users (the directories the leaderboard resolves against)
//! - Activities (the raw activity log)
//! - Workouts (suggestions, read-only for the API)
//! - Leaderboard (mirror of the last published snapshot)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ActivityDocument, LeaderboardEntry, TeamRecord, UserRecord, WorkoutRecord};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Only the Firestore document ID of a stored object.
#[derive(Deserialize)]
struct StoredId {
    #[serde(rename = "_firestore_id")]
    firestore_id: Option<String>,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJvY3RvZml0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore Emulator");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Leaderboard Inputs ──────────────────────────────────────

    /// Load the whole activity log.
    pub async fn list_activities(&self) -> Result<Vec<ActivityDocument>, AppError> {
        self.list_all(collections::ACTIVITIES).await
    }

    /// Load the user directory.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        self.list_all(collections::USERS).await
    }

    /// Load the team directory.
    pub async fn list_teams(&self) -> Result<Vec<TeamRecord>, AppError> {
        self.list_all(collections::TEAMS).await
    }

    /// Get a single user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, AppError> {
        self.list_all(collections::WORKOUTS).await
    }

    /// Get the persisted leaderboard, in rank order.
    pub async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .order_by([("rank", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Writes ──────────────────────────────────────────────────

    pub async fn upsert_team(&self, team: &TeamRecord) -> Result<(), AppError> {
        self.upsert(collections::TEAMS, &team.id, team).await
    }

    pub async fn upsert_user(&self, user: &UserRecord) -> Result<(), AppError> {
        self.upsert(collections::USERS, &user.id, user).await
    }

    pub async fn upsert_workout(&self, workout: &WorkoutRecord) -> Result<(), AppError> {
        self.upsert(collections::WORKOUTS, &workout.id, workout).await
    }

    pub async fn upsert_activity(&self, activity: &ActivityDocument) -> Result<(), AppError> {
        self.upsert(collections::ACTIVITIES, &activity.id, activity)
            .await
    }

    /// Store many activities.
    ///
    /// Uses concurrent writes with a limit to avoid overloading Firestore.
    pub async fn batch_upsert_activities(
        &self,
        activities: &[ActivityDocument],
    ) -> Result<(), AppError> {
        stream::iter(activities)
            .map(|activity| self.upsert_activity(activity))
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(())
    }

    /// Replace the stored leaderboard with `entries`.
    ///
    /// Old rows are deleted first; documents are keyed by zero-padded rank
    /// so user IDs that are not valid document IDs can still be stored.
    pub async fn replace_leaderboard(&self, entries: &[LeaderboardEntry]) -> Result<(), AppError> {
        let removed = self.clear_collection(collections::LEADERBOARD).await?;
        let client = self.get_client()?;

        for chunk in entries.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for entry in chunk {
                client
                    .fluent()
                    .update()
                    .in_col(collections::LEADERBOARD)
                    .document_id(leaderboard_doc_id(entry.rank))
                    .object(entry)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add leaderboard entry to transaction: {}",
                            e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit leaderboard batch: {}", e))
            })?;
        }

        tracing::info!(removed, written = entries.len(), "Leaderboard persisted");
        Ok(())
    }

    /// Delete every document in `collection`. Returns the number deleted.
    pub async fn clear_collection(&self, collection: &str) -> Result<usize, AppError> {
        let ids: Vec<String> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .obj::<StoredId>()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .filter_map(|doc| doc.firestore_id)
            .collect();

        self.batch_delete(&ids, collection).await?;
        tracing::debug!(collection, count = ids.len(), "Cleared collection");

        Ok(ids.len())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    async fn list_all<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: for<'de> Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(format!("Failed to list {}: {}", collection, e)))
    }

    async fn upsert<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<(), AppError>
    where
        T: Serialize + Sync + Send + for<'de> Deserialize<'de>,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Batch delete documents using transactions.
    async fn batch_delete(&self, doc_ids: &[String], collection: &str) -> Result<(), AppError> {
        let client = self.get_client()?;

        for chunk in doc_ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

fn leaderboard_doc_id(rank: u32) -> String {
    format!("rank_{:06}", rank)
}
