// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reduction tips shown on the dashboard.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A catalog tip selected for a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    /// Category the tip was selected for (None for generic tips)
    pub category_id: Option<u32>,
}

impl Suggestion {
    pub fn new(title: &str, description: &str, category_id: Option<u32>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            category_id,
        }
    }
}
