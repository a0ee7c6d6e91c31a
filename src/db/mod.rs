//! Database layer: the `CarbonStore` port and its adapters.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{
    Activity, Category, CategoryEmissionResult, NewActivity, NewUser, Report, ReportState, User,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ACTIVITIES: &str = "activities";
    pub const CATEGORIES: &str = "categories";
    /// Per-user emission reports (keyed by user_id)
    pub const REPORTS: &str = "reports";
    /// Username claims (keyed by username)
    pub const USERNAMES: &str = "usernames";
}

/// Persistence operations the service needs.
///
/// Adapters own storage details; all business rules (CO2 computation,
/// ownership, rollup) live in `services`.
#[async_trait]
pub trait CarbonStore: Send + Sync {
    // ─── Categories ──────────────────────────────────────────────

    async fn get_category(&self, category_id: u32) -> Result<Option<Category>, AppError>;

    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    /// Emission factor of a category, if the category exists.
    async fn category_emission_factor(&self, category_id: u32) -> Result<Option<f64>, AppError> {
        Ok(self
            .get_category(category_id)
            .await?
            .map(|c| c.emission_factor))
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Create a user. Fails with `Conflict` if the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    // ─── Activities ──────────────────────────────────────────────

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, AppError>;

    async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError>;

    /// Replace a stored activity.
    async fn update_activity(&self, activity: &Activity) -> Result<(), AppError>;

    async fn delete_activity(&self, activity_id: u64) -> Result<(), AppError>;

    /// All activities of a user, newest `start_date` first.
    async fn list_activities(&self, user_id: u64) -> Result<Vec<Activity>, AppError>;

    /// Per-category totals for a user, highest total first.
    async fn category_emissions(
        &self,
        user_id: u64,
    ) -> Result<Vec<CategoryEmissionResult>, AppError> {
        let activities = self.list_activities(user_id).await?;
        let categories = self.list_categories().await?;
        Ok(group_by_category(&activities, &categories))
    }

    /// Sum of CO2 results over a user's activities (0 when there are none).
    async fn sum_emissions(&self, user_id: u64) -> Result<f64, AppError> {
        Ok(total_emission(&self.list_activities(user_id).await?))
    }

    // ─── Reports ─────────────────────────────────────────────────

    async fn get_report(&self, user_id: u64) -> Result<Option<Report>, AppError>;

    /// Insert or replace a user's report.
    async fn upsert_report(&self, report: &Report) -> Result<(), AppError>;

    /// Recompute a user's total from their activities and store it.
    ///
    /// Returns the report state before the write and the stored report.
    /// Callers serialize this per user within a process; adapters shared
    /// between processes must also make it atomic on their side.
    async fn recompute_report(
        &self,
        user_id: u64,
        updated_at: String,
    ) -> Result<(ReportState, Report), AppError> {
        let state = ReportState::of(self.get_report(user_id).await?.as_ref());
        let report = Report {
            user_id,
            total_emission: self.sum_emissions(user_id).await?,
            updated_at,
        };
        self.upsert_report(&report).await?;
        Ok((state, report))
    }
}

/// Sum of CO2 results. An empty slice sums to positive zero.
pub fn total_emission(activities: &[Activity]) -> f64 {
    activities.iter().fold(0.0, |acc, a| acc + a.co2_result)
}

/// Group activities into per-category totals, highest total first.
///
/// Activities whose category is unknown are grouped under "Unknown".
/// Ties are ordered by category ID.
pub fn group_by_category(
    activities: &[Activity],
    categories: &[Category],
) -> Vec<CategoryEmissionResult> {
    let mut totals: HashMap<u32, f64> = HashMap::new();
    for activity in activities {
        *totals.entry(activity.category_id).or_insert(0.0) += activity.co2_result;
    }

    let mut results: Vec<CategoryEmissionResult> = totals
        .into_iter()
        .map(|(category_id, total_emission)| CategoryEmissionResult {
            category_id,
            category_name: categories
                .iter()
                .find(|c| c.category_id == category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            total_emission,
        })
        .collect();

    results.sort_by(|a, b| {
        b.total_emission
            .total_cmp(&a.total_emission)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    results
}
