// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user emission report (cached rollup of activity CO2 results).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Cached total emission for one user.
///
/// Stored at: `reports/{user_id}`
///
/// Recomputed from the user's activities after every activity mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Report {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub total_emission: f64,
    /// Last rollup timestamp (ISO 8601)
    #[serde(default)]
    pub updated_at: String,
}

/// Rollup state of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    NoReport,
    HasReport,
}

impl ReportState {
    pub fn of(report: Option<&Report>) -> Self {
        match report {
            Some(_) => Self::HasReport,
            None => Self::NoReport,
        }
    }
}
