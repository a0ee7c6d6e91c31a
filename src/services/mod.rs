// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod calculator;
pub mod factors;
pub mod footprint;
pub mod password;
pub mod rollup;
pub mod suggestions;
pub mod summary;
pub mod weather;

pub use activity::{ActivityMutation, ActivityService, ReportSync};
pub use calculator::{CarbonCalculator, Calculation, CalculationRequest};
pub use factors::EmissionFactorTable;
pub use footprint::FootprintAggregator;
pub use rollup::ReportRollup;
pub use suggestions::{SuggestionEngine, SuggestionStrategy};
pub use summary::EmissionsSummary;
pub use weather::WeatherService;
