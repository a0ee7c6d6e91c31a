// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Logged activity model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Activity ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: u64,
    /// Owning user
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub category_id: u32,
    pub activity_name: String,
    /// Amount of the activity in `unit` (km, meals, kWh, ...)
    pub quantity: f64,
    pub unit: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub start_date: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub end_date: NaiveDate,
    /// kg CO2 computed from the category emission factor
    #[serde(rename = "CO2_result")]
    pub co2_result: f64,
}

/// Activity fields before an ID has been assigned by the store.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: u64,
    pub category_id: u32,
    pub activity_name: String,
    pub quantity: f64,
    pub unit: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub co2_result: f64,
}

impl NewActivity {
    /// Attach a store-assigned ID.
    pub fn with_id(self, activity_id: u64) -> Activity {
        Activity {
            activity_id,
            user_id: self.user_id,
            category_id: self.category_id,
            activity_name: self.activity_name,
            quantity: self.quantity,
            unit: self.unit,
            start_date: self.start_date,
            end_date: self.end_date,
            co2_result: self.co2_result,
        }
    }
}

/// Activity submission from a user (create or full update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct ActivityInput {
    #[validate(length(min = 1, message = "Activity name is required"))]
    pub activity_name: String,
    #[validate(range(min = 1, max = 6, message = "Category ID must be between 1 and 6"))]
    pub category_id: u32,
    #[validate(range(min = 0.0, message = "Quantity must be a positive number"))]
    pub quantity: f64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ActivityInput {
    /// End date, defaulting to the start date when absent.
    pub fn effective_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }
}

fn validate_date_range(input: &ActivityInput) -> Result<(), ValidationError> {
    match input.end_date {
        Some(end) if end < input.start_date => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("End date must not be before start date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
