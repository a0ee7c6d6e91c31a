// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing `CarbonStore`.
//!
//! Collections:
//! - `users` (accounts, keyed by user_id)
//! - `activities` (logged activities, keyed by activity_id)
//! - `categories` (emission factors, keyed by category_id; seeded on connect)
//! - `reports` (per-user emission totals, keyed by user_id)
//! - `usernames` (username claims pointing at a user_id)

use crate::db::{collections, total_emission, CarbonStore};
use crate::error::AppError;
use crate::models::{Activity, Category, NewActivity, NewUser, Report, ReportState, User};
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use ring::rand::SystemRandom;
use serde::{Deserialize, Serialize};

/// Generated IDs stay within the range a JavaScript number represents exactly.
const MAX_SAFE_ID: u64 = (1 << 53) - 1;

/// Claim document reserving a username.
///
/// Stored at: `usernames/name_{username}`. Created with `insert`, which
/// fails if the document already exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UsernameClaim {
    user_id: u64,
}

fn username_doc_id(username: &str) -> String {
    format!("name_{}", username)
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
    rng: SystemRandom,
}

impl FirestoreDb {
    /// Create a new Firestore client and seed the category table.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator needs an unauthenticated connection to avoid local
        // credential lookups.
        let client = if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            Self::create_emulator_client(project_id).await?
        } else {
            let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
                AppError::Database(format!("Failed to connect to Firestore: {}", e))
            })?;
            tracing::info!(project = project_id, "Connected to Firestore");
            client
        };

        let db = Self {
            client,
            rng: SystemRandom::new(),
        };
        db.seed_categories().await?;
        Ok(db)
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
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

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(client)
    }

    /// Insert any base categories missing from the `categories` collection.
    async fn seed_categories(&self) -> Result<(), AppError> {
        let mut seeded = 0;
        for category in Category::base_schema() {
            if self.get_category(category.category_id).await?.is_none() {
                self.set_category(&category).await?;
                seeded += 1;
            }
        }
        if seeded > 0 {
            tracing::info!(seeded, "Seeded emission categories");
        }
        Ok(())
    }

    /// Create or replace a category.
    pub async fn set_category(&self, category: &Category) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::CATEGORIES)
            .document_id(category.category_id.to_string())
            .object(category)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Random document ID.
    fn generate_id(&self) -> Result<u64, AppError> {
        let bytes: [u8; 8] = ring::rand::generate(&self.rng)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Random ID generation failed")))?
            .expose();
        Ok((u64::from_le_bytes(bytes) & MAX_SAFE_ID).max(1))
    }

    async fn set_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.user_id.to_string())
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Reserve `username` for `user_id`. `Conflict` if it is already taken.
    async fn claim_username(&self, username: &str, user_id: u64) -> Result<(), AppError> {
        let result: Result<UsernameClaim, FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collections::USERNAMES)
            .document_id(username_doc_id(username))
            .object(&UsernameClaim { user_id })
            .execute()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(FirestoreError::DataConflictError(_)) => {
                Err(AppError::Conflict("Username already exists".to_string()))
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn release_username(&self, username: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::USERNAMES)
            .document_id(username_doc_id(username))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(activity.activity_id.to_string())
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CarbonStore for FirestoreDb {
    // ─── Category Operations ─────────────────────────────────────

    async fn get_category(&self, category_id: u32) -> Result<Option<Category>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::CATEGORIES)
            .obj()
            .one(&category_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::CATEGORIES)
            .order_by([(
                "category_id",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let user = user.with_id(self.generate_id()?);
        self.claim_username(&user.username, user.user_id).await?;

        if let Err(e) = self.set_user(&user).await {
            if let Err(release) = self.release_username(&user.username).await {
                tracing::error!(
                    user_id = user.user_id,
                    error = %release,
                    "Failed to release username after user write failed"
                );
            }
            return Err(e);
        }

        tracing::info!(user_id = user.user_id, "User created");
        Ok(user)
    }

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let claim: Option<UsernameClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USERNAMES)
            .obj()
            .one(&username_doc_id(username))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match claim {
            Some(claim) => self.get_user(claim.user_id).await,
            None => Ok(None),
        }
    }

    // ─── Activity Operations ─────────────────────────────────────

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, AppError> {
        let activity = activity.with_id(self.generate_id()?);
        self.set_activity(&activity).await?;
        Ok(activity)
    }

    async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITIES)
            .obj()
            .one(&activity_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn update_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.set_activity(activity).await
    }

    async fn delete_activity(&self, activity_id: u64) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::ACTIVITIES)
            .document_id(activity_id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_activities(&self, user_id: u64) -> Result<Vec<Activity>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id)]))
            .order_by([(
                "start_date",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Report Operations ───────────────────────────────────────

    async fn get_report(&self, user_id: u64) -> Result<Option<Report>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::REPORTS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_report(&self, report: &Report) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::REPORTS)
            .document_id(report.user_id.to_string())
            .object(report)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Recompute the report inside a transaction.
    ///
    /// The report document is read within the transaction, so concurrent
    /// rollups for one user from different instances are serialized by
    /// Firestore: the later one sees every activity the earlier one saw.
    async fn recompute_report(
        &self,
        user_id: u64,
        updated_at: String,
    ) -> Result<(ReportState, Report), AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let tx_db = self.client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );

        // 1. Read the current report within the transaction
        let current: Option<Report> = tx_db
            .fluent()
            .select()
            .by_id_in(collections::REPORTS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read report in transaction: {}", e))
            })?;

        // 2. Sum the user's activities at the same snapshot
        let activities: Vec<Activity> = tx_db
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read activities in transaction: {}", e))
            })?;

        let report = Report {
            user_id,
            total_emission: total_emission(&activities),
            updated_at,
        };

        // 3. Write the report and commit
        self.client
            .fluent()
            .update()
            .in_col(collections::REPORTS)
            .document_id(user_id.to_string())
            .object(&report)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add report to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok((ReportState::of(current.as_ref()), report))
    }
}
