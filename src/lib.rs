// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon-Tracker: personal carbon footprint tracking
//!
//! This crate provides the backend API for logging everyday activities,
//! converting them to kg CO2 equivalent, and keeping per-user totals and
//! reduction suggestions up to date.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::CarbonStore;
use services::{
    ActivityService, CarbonCalculator, EmissionFactorTable, FootprintAggregator, ReportRollup,
    SuggestionEngine, WeatherService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn CarbonStore>,
    pub calculator: CarbonCalculator,
    pub footprint: FootprintAggregator,
    pub activities: ActivityService,
    pub rollup: ReportRollup,
    pub suggestions: SuggestionEngine,
    pub weather: WeatherService,
}

impl AppState {
    /// Wire services over a store and a factor table.
    pub fn new(
        config: Config,
        store: Arc<dyn CarbonStore>,
        factors: Arc<EmissionFactorTable>,
    ) -> Self {
        let calculator = CarbonCalculator::new(factors);
        let rollup = ReportRollup::new(store.clone());

        Self {
            footprint: FootprintAggregator::new(calculator.clone()),
            activities: ActivityService::new(store.clone(), rollup.clone()),
            suggestions: SuggestionEngine::new(config.suggestion_strategy),
            weather: WeatherService::new(config.openweather_api_key.clone()),
            calculator,
            rollup,
            store,
            config,
        }
    }
}
