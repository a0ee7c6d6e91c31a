// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard emissions summary.

use crate::db::group_by_category;
use crate::models::{Activity, Category, CategoryEmissionResult};
use crate::time_utils::window_start;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Total emissions of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyEmission {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub total_emission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmissionsSummary {
    /// Daily totals over the trailing window, oldest first
    pub weekly_trend: Vec<DailyEmission>,
    /// Per-category totals, highest first
    pub by_category: Vec<CategoryEmissionResult>,
    pub total_emission: f64,
    pub average_per_activity: f64,
    pub activity_count: usize,
}

impl EmissionsSummary {
    /// Summarize a user's activities.
    ///
    /// The trend covers activities starting on or after
    /// `today - window_days`; totals cover all activities.
    pub fn build(
        activities: &[Activity],
        categories: &[Category],
        today: NaiveDate,
        window_days: i64,
    ) -> Self {
        let since = window_start(today, window_days);

        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for activity in activities.iter().filter(|a| a.start_date >= since) {
            *daily.entry(activity.start_date).or_insert(0.0) += activity.co2_result;
        }
        let weekly_trend = daily
            .into_iter()
            .map(|(date, total_emission)| DailyEmission {
                date,
                total_emission,
            })
            .collect();

        let by_category = group_by_category(activities, categories);
        let total_emission = by_category
            .iter()
            .fold(0.0, |acc, c| acc + c.total_emission);
        let activity_count = activities.len();
        let average_per_activity = if activity_count == 0 {
            0.0
        } else {
            total_emission / activity_count as f64
        };

        Self {
            weekly_trend,
            by_category,
            total_emission,
            average_per_activity,
            activity_count,
        }
    }
}
