// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emission factor table (kg CO2 per unit of activity).
//!
//! Built once at startup and shared read-only. Lookups never fail: an
//! unknown vehicle, country or diet key resolves to a documented default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Fallback for unknown vehicle keys (medium petrol car, kg CO2/km).
pub const DEFAULT_TRANSPORT_FACTOR: f64 = 0.19;
/// Fallback for unknown flight keys (domestic flight, kg CO2/km per seat).
pub const DEFAULT_FLIGHT_FACTOR: f64 = 0.25;
/// Fallback for unknown countries (world average grid, kg CO2/kWh).
pub const DEFAULT_ELECTRICITY_FACTOR: f64 = 0.475;
/// Fallback for unknown diets (average diet, kg CO2/meal).
pub const DEFAULT_DIET_FACTOR: f64 = 1.8;

pub const WORLD_AVERAGE: &str = "world_average";
pub const DEFAULT_DIET: &str = "average";

/// Emission factors grouped by domain.
///
/// `BTreeMap` keeps the `/carbon/methods` listing in a stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactorTable {
    /// Vehicle/mode key → kg CO2 per km (flights: per seat-km)
    pub transport: BTreeMap<String, f64>,
    /// Country code → kg CO2 per kWh
    pub electricity: BTreeMap<String, f64>,
    /// Diet type → kg CO2 per meal
    pub diet: BTreeMap<String, f64>,
    /// Household fuel/utility → kg CO2 per unit
    #[serde(default)]
    pub household: BTreeMap<String, f64>,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self::scientific()
    }
}

impl EmissionFactorTable {
    /// Built-in table compiled from EPA and IPCC figures.
    pub fn scientific() -> Self {
        Self {
            transport: table(&[
                ("car_petrol_small", 0.15),
                ("car_petrol_medium", 0.19),
                ("car_petrol_large", 0.25),
                ("car_diesel_small", 0.13),
                ("car_diesel_medium", 0.17),
                ("car_diesel_large", 0.22),
                ("car_hybrid", 0.11),
                ("car_electric", 0.05),
                ("motorcycle", 0.11),
                ("bus", 0.09),
                ("train_electric", 0.04),
                ("train_diesel", 0.06),
                ("flight_domestic", 0.25),
                ("flight_short_haul", 0.18),
                ("flight_long_haul", 0.15),
            ]),
            electricity: table(&[
                ("US", 0.429),
                ("CA", 0.130),
                ("GB", 0.233),
                ("DE", 0.408),
                ("FR", 0.058),
                ("CN", 0.681),
                ("IN", 0.820),
                ("AU", 0.790),
                ("BR", 0.090),
                (WORLD_AVERAGE, 0.475),
            ]),
            diet: table(&[
                ("beef_heavy", 3.5),
                ("meat_heavy", 2.5),
                (DEFAULT_DIET, 1.8),
                ("vegetarian", 0.9),
                ("vegan", 0.7),
            ]),
            household: table(&[
                ("natural_gas_per_kwh", 0.2),
                ("heating_oil_per_liter", 2.7),
                ("propane_per_liter", 1.5),
                ("water_per_cubic_meter", 0.34),
            ]),
        }
    }

    /// Load a table from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FactorError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| FactorError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a table from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, FactorError> {
        let table: Self =
            serde_json::from_str(json_data).map_err(|e| FactorError::ParseError(e.to_string()))?;

        let negative = table
            .transport
            .iter()
            .chain(&table.electricity)
            .chain(&table.diet)
            .chain(&table.household)
            .find(|(_, factor)| !(factor.is_finite() && **factor >= 0.0));
        if let Some((key, factor)) = negative {
            return Err(FactorError::InvalidFactor(key.clone(), *factor));
        }

        tracing::info!(
            transport = table.transport.len(),
            electricity = table.electricity.len(),
            diet = table.diet.len(),
            "Loaded emission factors"
        );
        Ok(table)
    }

    /// Factor for a ground or air vehicle key.
    pub fn transport(&self, vehicle_type: &str) -> f64 {
        self.transport
            .get(vehicle_type)
            .copied()
            .unwrap_or(DEFAULT_TRANSPORT_FACTOR)
    }

    /// Factor for a flight key. Unknown flights use the domestic factor.
    pub fn flight(&self, flight_type: &str) -> f64 {
        self.transport
            .get(flight_type)
            .copied()
            .unwrap_or(DEFAULT_FLIGHT_FACTOR)
    }

    /// Grid factor for a country code, falling back to the world average.
    pub fn electricity(&self, country: &str) -> f64 {
        self.electricity
            .get(country)
            .or_else(|| self.electricity.get(WORLD_AVERAGE))
            .copied()
            .unwrap_or(DEFAULT_ELECTRICITY_FACTOR)
    }

    /// Factor for a diet type, falling back to the average diet.
    pub fn diet(&self, diet_type: &str) -> f64 {
        self.diet
            .get(diet_type)
            .or_else(|| self.diet.get(DEFAULT_DIET))
            .copied()
            .unwrap_or(DEFAULT_DIET_FACTOR)
    }
}

/// Whether a transport key denotes air travel (factor is already per seat).
pub fn is_flight(vehicle_type: &str) -> bool {
    vehicle_type.contains("flight")
}

fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(key, factor)| (key.to_string(), *factor))
        .collect()
}

/// Errors from loading a factor table.
#[derive(Debug, thiserror::Error)]
pub enum FactorError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse factor table: {0}")]
    ParseError(String),

    #[error("Invalid emission factor for {0}: {1}")]
    InvalidFactor(String, f64),
}
