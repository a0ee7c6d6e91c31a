// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store backed by concurrent maps.
//!
//! Used for local development and tests. Data is lost on restart.

use crate::db::CarbonStore;
use crate::error::AppError;
use crate::models::{Activity, Category, NewActivity, NewUser, Report, User};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Store state shared between clones.
#[derive(Default)]
struct Inner {
    categories: DashMap<u32, Category>,
    users: DashMap<u64, User>,
    /// Username → user_id, claimed atomically on registration
    usernames: DashMap<String, u64>,
    activities: DashMap<u64, Activity>,
    reports: DashMap<u64, Report>,
    next_user_id: AtomicU64,
    next_activity_id: AtomicU64,
}

/// In-memory `CarbonStore`.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store seeded with the base category schema.
    pub fn new() -> Self {
        Self::with_categories(Category::base_schema())
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        let inner = Inner::default();
        for category in categories {
            inner.categories.insert(category.category_id, category);
        }
        Self {
            inner: Arc::new(inner),
        }
    }

    fn next_id(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl CarbonStore for MemoryStore {
    async fn get_category(&self, category_id: u32) -> Result<Option<Category>, AppError> {
        Ok(self
            .inner
            .categories
            .get(&category_id)
            .map(|c| c.value().clone()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> = self
            .inner
            .categories
            .iter()
            .map(|c| c.value().clone())
            .collect();
        categories.sort_by_key(|c| c.category_id);
        Ok(categories)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        match self.inner.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict("Username already exists".to_string())),
            Entry::Vacant(slot) => {
                let user = user.with_id(Self::next_id(&self.inner.next_user_id));
                slot.insert(user.user_id);
                self.inner.users.insert(user.user_id, user.clone());
                Ok(user)
            }
        }
    }

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        Ok(self.inner.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user_id = match self.inner.usernames.get(username) {
            Some(id) => *id,
            None => return Ok(None),
        };
        self.get_user(user_id).await
    }

    async fn insert_activity(&self, activity: NewActivity) -> Result<Activity, AppError> {
        let activity = activity.with_id(Self::next_id(&self.inner.next_activity_id));
        self.inner
            .activities
            .insert(activity.activity_id, activity.clone());
        Ok(activity)
    }

    async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError> {
        Ok(self
            .inner
            .activities
            .get(&activity_id)
            .map(|a| a.value().clone()))
    }

    async fn update_activity(&self, activity: &Activity) -> Result<(), AppError> {
        match self.inner.activities.get_mut(&activity.activity_id) {
            Some(mut existing) => {
                *existing = activity.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "Activity {} not found",
                activity.activity_id
            ))),
        }
    }

    async fn delete_activity(&self, activity_id: u64) -> Result<(), AppError> {
        self.inner.activities.remove(&activity_id);
        Ok(())
    }

    async fn list_activities(&self, user_id: u64) -> Result<Vec<Activity>, AppError> {
        let mut activities: Vec<Activity> = self
            .inner
            .activities
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.value().clone())
            .collect();
        activities.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| b.activity_id.cmp(&a.activity_id))
        });
        Ok(activities)
    }

    async fn get_report(&self, user_id: u64) -> Result<Option<Report>, AppError> {
        Ok(self.inner.reports.get(&user_id).map(|r| r.value().clone()))
    }

    async fn upsert_report(&self, report: &Report) -> Result<(), AppError> {
        self.inner.reports.insert(report.user_id, report.clone());
        Ok(())
    }
}
