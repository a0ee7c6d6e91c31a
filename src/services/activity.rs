// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging service.
//!
//! Handles the core workflow for each mutation:
//! 1. Verify ownership (update/delete)
//! 2. Look up the category emission factor (reject unknown categories)
//! 3. Compute `co2_result = quantity × factor`
//! 4. Write the activity
//! 5. Roll up the user's report
//!
//! A rollup failure after the write is logged and reported as
//! [`ReportSync::Pending`]; the activity change itself stands.

use crate::db::CarbonStore;
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityInput, NewActivity};
use crate::services::rollup::ReportRollup;
use serde::Serialize;
use std::sync::Arc;

/// State of the user's report after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportSync {
    Synced { total_emission: f64 },
    /// The rollup failed; the next successful rollup reconciles it.
    Pending,
}

/// Result of a create, update or delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMutation {
    pub activity_id: u64,
    #[serde(rename = "CO2_result")]
    pub co2_result: f64,
    pub report: ReportSync,
}

/// Creates, updates and deletes activities for their owners.
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn CarbonStore>,
    rollup: ReportRollup,
}

impl ActivityService {
    pub fn new(store: Arc<dyn CarbonStore>, rollup: ReportRollup) -> Self {
        Self { store, rollup }
    }

    /// All activities of a user, newest first.
    pub async fn list(&self, user_id: u64) -> Result<Vec<Activity>> {
        self.store.list_activities(user_id).await
    }

    /// Log a new activity.
    pub async fn create(&self, user_id: u64, input: &ActivityInput) -> Result<ActivityMutation> {
        let co2_result = self.compute_co2(input).await?;

        let activity = self
            .store
            .insert_activity(NewActivity {
                user_id,
                category_id: input.category_id,
                activity_name: input.activity_name.trim().to_string(),
                quantity: input.quantity,
                unit: input.unit.trim().to_string(),
                start_date: input.start_date,
                end_date: input.effective_end_date(),
                co2_result,
            })
            .await?;

        tracing::info!(
            user_id,
            activity_id = activity.activity_id,
            category_id = activity.category_id,
            co2_result,
            "Activity created"
        );

        Ok(self.finish(user_id, activity.activity_id, co2_result).await)
    }

    /// Replace an activity owned by `user_id`, recomputing its CO2.
    pub async fn update(
        &self,
        user_id: u64,
        activity_id: u64,
        input: &ActivityInput,
    ) -> Result<ActivityMutation> {
        let existing = self.owned_activity(user_id, activity_id).await?;
        let co2_result = self.compute_co2(input).await?;

        let activity = Activity {
            activity_id: existing.activity_id,
            user_id: existing.user_id,
            category_id: input.category_id,
            activity_name: input.activity_name.trim().to_string(),
            quantity: input.quantity,
            unit: input.unit.trim().to_string(),
            start_date: input.start_date,
            end_date: input.effective_end_date(),
            co2_result,
        };
        self.store.update_activity(&activity).await?;

        tracing::info!(user_id, activity_id, co2_result, "Activity updated");

        Ok(self.finish(user_id, activity_id, co2_result).await)
    }

    /// Delete an activity owned by `user_id`.
    pub async fn delete(&self, user_id: u64, activity_id: u64) -> Result<ActivityMutation> {
        let existing = self.owned_activity(user_id, activity_id).await?;
        self.store.delete_activity(activity_id).await?;

        tracing::info!(user_id, activity_id, "Activity deleted");

        Ok(self.finish(user_id, activity_id, existing.co2_result).await)
    }

    /// Fetch an activity, hiding other users' activities as not found.
    async fn owned_activity(&self, user_id: u64, activity_id: u64) -> Result<Activity> {
        match self.store.get_activity(activity_id).await? {
            Some(activity) if activity.user_id == user_id => Ok(activity),
            Some(_) => {
                tracing::warn!(user_id, activity_id, "Rejected access to foreign activity");
                Err(AppError::NotFound("Activity not found".to_string()))
            }
            None => Err(AppError::NotFound("Activity not found".to_string())),
        }
    }

    async fn compute_co2(&self, input: &ActivityInput) -> Result<f64> {
        let factor = self
            .store
            .category_emission_factor(input.category_id)
            .await?
            .ok_or(AppError::InvalidCategory(input.category_id))?;
        Ok(input.quantity * factor)
    }

    async fn finish(&self, user_id: u64, activity_id: u64, co2_result: f64) -> ActivityMutation {
        let report = match self.rollup.refresh(user_id).await {
            Ok(outcome) => ReportSync::Synced {
                total_emission: outcome.report.total_emission,
            },
            Err(e) => {
                tracing::warn!(
                    user_id,
                    activity_id,
                    error = %e,
                    "Report rollup failed; activity change kept"
                );
                ReportSync::Pending
            }
        };

        ActivityMutation {
            activity_id,
            co2_result,
            report,
        }
    }
}
