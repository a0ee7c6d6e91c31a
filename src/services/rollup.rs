// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user report rollup.
//!
//! The report is a cache of `SUM(co2_result)` over a user's activities.
//! Every refresh recomputes the sum from scratch, so a user with no
//! activities always ends at exactly zero and a failed refresh is repaired
//! by the next one.
//!
//! Refreshes for one user are serialized by a per-user lock within this
//! process. Across processes the store's `recompute_report` is atomic
//! (a Firestore transaction on the report document).

use crate::db::CarbonStore;
use crate::error::AppError;
use crate::models::{Report, ReportState};
use crate::time_utils::format_utc_rfc3339;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared per-user rollup locks.
pub type RollupLocks = Arc<DashMap<u64, Arc<Mutex<()>>>>;

/// Which transition a refresh performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupTransition {
    /// no-report → has-report
    Inserted,
    /// has-report → has-report
    Updated,
}

/// Result of a successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupOutcome {
    pub transition: RollupTransition,
    pub report: Report,
}

/// Keeps each user's `Report` in sync with their activities.
#[derive(Clone)]
pub struct ReportRollup {
    store: Arc<dyn CarbonStore>,
    locks: RollupLocks,
}

impl ReportRollup {
    pub fn new(store: Arc<dyn CarbonStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Recompute and persist the total for `user_id`.
    pub async fn refresh(&self, user_id: u64) -> Result<RollupOutcome, AppError> {
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let (state, report) = self
            .store
            .recompute_report(user_id, format_utc_rfc3339(chrono::Utc::now()))
            .await?;

        let transition = match state {
            ReportState::NoReport => RollupTransition::Inserted,
            ReportState::HasReport => RollupTransition::Updated,
        };

        tracing::debug!(
            user_id,
            total_emission = report.total_emission,
            transition = ?transition,
            "Report rolled up"
        );

        Ok(RollupOutcome { transition, report })
    }
}
