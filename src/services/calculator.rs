// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity CO2 calculators.
//!
//! Each calculator is a pure lookup-and-multiply over the shared
//! [`EmissionFactorTable`]. Results carry `carbon_kg` rounded to three
//! decimals and a breakdown whose `calculation` string reproduces the
//! formula, so a caller can check the number without re-deriving it.
//!
//! Quantities are not validated here: zero or negative input yields zero or
//! negative CO2.

use crate::error::AppError;
use crate::services::factors::{is_flight, EmissionFactorTable};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Provenance tag reported with every calculation.
pub const FACTOR_SOURCE: &str = "scientific_data";

pub const DEFAULT_VEHICLE: &str = "car_petrol_medium";
pub const DEFAULT_FLIGHT: &str = "flight_domestic";
pub const DEFAULT_COUNTRY: &str = "US";

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Distance unit accepted by the transport and flight calculators.
///
/// Anything other than a spelling of miles is treated as kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
}

impl DistanceUnit {
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_ascii_lowercase().as_str() {
            "miles" | "mile" | "mi" => Self::Miles,
            _ => Self::Km,
        }
    }

    pub fn to_km(self, distance: f64) -> f64 {
        match self {
            Self::Km => distance,
            Self::Miles => distance * KM_PER_MILE,
        }
    }
}

impl From<String> for DistanceUnit {
    fn from(unit: String) -> Self {
        Self::parse(&unit)
    }
}

/// Energy unit accepted by the electricity calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum EnergyUnit {
    #[default]
    Kwh,
    Mwh,
}

impl EnergyUnit {
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_ascii_lowercase().as_str() {
            "mwh" => Self::Mwh,
            _ => Self::Kwh,
        }
    }

    pub fn to_kwh(self, usage: f64) -> f64 {
        match self {
            Self::Kwh => usage,
            Self::Mwh => usage * 1000.0,
        }
    }
}

impl From<String> for EnergyUnit {
    fn from(unit: String) -> Self {
        Self::parse(&unit)
    }
}

/// Activity types with a dedicated calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Transport,
    Electricity,
    Flight,
    Diet,
}

impl FromStr for ActivityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transport" => Ok(Self::Transport),
            "electricity" => Ok(Self::Electricity),
            "flight" => Ok(Self::Flight),
            "diet" => Ok(Self::Diet),
            other => Err(AppError::UnknownActivityType(other.to_string())),
        }
    }
}

/// Result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub success: bool,
    /// kg CO2, rounded to 3 decimals
    pub carbon_kg: f64,
    pub data: CalculationDetails,
}

/// Structured breakdown of a calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "activity", rename_all = "snake_case")]
pub enum CalculationDetails {
    Transport {
        distance_km: f64,
        vehicle_type: String,
        passengers: u32,
        emission_factor: f64,
        calculation: String,
        source: String,
    },
    Electricity {
        usage: f64,
        unit: EnergyUnit,
        country: String,
        emission_factor: f64,
        calculation: String,
        source: String,
    },
    Flight {
        distance_km: f64,
        passengers: u32,
        flight_type: String,
        emission_factor: f64,
        calculation: String,
        source: String,
    },
    Diet {
        meals: f64,
        diet_type: String,
        emission_factor: f64,
        calculation: String,
        source: String,
    },
    /// Batch entry whose type has no calculator; contributes zero.
    Unknown,
}

impl CalculationDetails {
    /// The human-readable formula, if any.
    pub fn calculation(&self) -> Option<&str> {
        match self {
            Self::Transport { calculation, .. }
            | Self::Electricity { calculation, .. }
            | Self::Flight { calculation, .. }
            | Self::Diet { calculation, .. } => Some(calculation),
            Self::Unknown => None,
        }
    }
}

/// Single calculation request used by the combined endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub activity_type: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub flight_type: Option<String>,
    #[serde(default)]
    pub diet_type: Option<String>,
}

/// Stateless calculator over an immutable factor table.
#[derive(Debug, Clone)]
pub struct CarbonCalculator {
    factors: Arc<EmissionFactorTable>,
}

impl Default for CarbonCalculator {
    fn default() -> Self {
        Self::new(Arc::new(EmissionFactorTable::scientific()))
    }
}

impl CarbonCalculator {
    pub fn new(factors: Arc<EmissionFactorTable>) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    /// Ground or air travel over a distance.
    ///
    /// Ground vehicles share the factor between passengers; flight keys do
    /// not, since aviation factors are already per seat. A passenger count
    /// of zero is treated as one.
    pub fn calculate_transport(
        &self,
        distance: f64,
        unit: DistanceUnit,
        vehicle_type: &str,
        passengers: u32,
    ) -> Calculation {
        let distance_km = unit.to_km(distance);
        let emission_factor = self.factors.transport(vehicle_type);
        let passengers = passengers.max(1);

        let shared = !is_flight(vehicle_type) && passengers > 1;
        let effective_factor = if is_flight(vehicle_type) {
            emission_factor
        } else {
            emission_factor / f64::from(passengers)
        };

        let mut calculation = format!(
            "{} km × {} kg CO2/km",
            round_to(distance_km, 3),
            emission_factor
        );
        if shared {
            calculation.push_str(&format!(" ÷ {} passengers", passengers));
        }

        Calculation {
            success: true,
            carbon_kg: round_to(distance_km * effective_factor, 3),
            data: CalculationDetails::Transport {
                distance_km: round_to(distance_km, 2),
                vehicle_type: vehicle_type.to_string(),
                passengers,
                emission_factor,
                calculation,
                source: FACTOR_SOURCE.to_string(),
            },
        }
    }

    /// Grid electricity consumption in a country.
    pub fn calculate_electricity(&self, usage: f64, unit: EnergyUnit, country: &str) -> Calculation {
        let usage_kwh = unit.to_kwh(usage);
        let emission_factor = self.factors.electricity(country);

        Calculation {
            success: true,
            carbon_kg: round_to(usage_kwh * emission_factor, 3),
            data: CalculationDetails::Electricity {
                usage,
                unit,
                country: country.to_string(),
                emission_factor,
                calculation: format!(
                    "{} kWh × {} kg CO2/kWh",
                    round_to(usage_kwh, 3),
                    emission_factor
                ),
                source: FACTOR_SOURCE.to_string(),
            },
        }
    }

    /// Flight for a party of `passengers`; the per-seat factor is
    /// multiplied by headcount.
    pub fn calculate_flight(
        &self,
        passengers: u32,
        distance: f64,
        unit: DistanceUnit,
        flight_type: &str,
    ) -> Calculation {
        let distance_km = unit.to_km(distance);
        let emission_factor = self.factors.flight(flight_type);

        Calculation {
            success: true,
            carbon_kg: round_to(distance_km * f64::from(passengers) * emission_factor, 3),
            data: CalculationDetails::Flight {
                distance_km: round_to(distance_km, 2),
                passengers,
                flight_type: flight_type.to_string(),
                emission_factor,
                calculation: format!(
                    "{} km × {} passengers × {} kg CO2/km",
                    round_to(distance_km, 3),
                    passengers,
                    emission_factor
                ),
                source: FACTOR_SOURCE.to_string(),
            },
        }
    }

    /// Meals of a given diet type.
    pub fn calculate_diet(&self, meals: f64, diet_type: &str) -> Calculation {
        let emission_factor = self.factors.diet(diet_type);

        Calculation {
            success: true,
            carbon_kg: round_to(meals * emission_factor, 3),
            data: CalculationDetails::Diet {
                meals,
                diet_type: diet_type.to_string(),
                emission_factor,
                calculation: format!("{} meals × {} kg CO2/meal", meals, emission_factor),
                source: FACTOR_SOURCE.to_string(),
            },
        }
    }

    /// Dispatch a single request by `activity_type`.
    ///
    /// Unrecognised types are rejected rather than silently computed as
    /// car travel.
    pub fn calculate(&self, request: &CalculationRequest) -> Result<Calculation, AppError> {
        let kind: ActivityKind = request.activity_type.parse()?;
        let unit = request.unit.as_deref().unwrap_or_default();

        let calculation = match kind {
            ActivityKind::Transport => self.calculate_transport(
                request.value,
                DistanceUnit::parse(unit),
                request.vehicle_type.as_deref().unwrap_or(DEFAULT_VEHICLE),
                request.passengers.unwrap_or(1),
            ),
            ActivityKind::Electricity => self.calculate_electricity(
                request.value,
                EnergyUnit::parse(unit),
                request.country.as_deref().unwrap_or(DEFAULT_COUNTRY),
            ),
            ActivityKind::Flight => self.calculate_flight(
                request.passengers.unwrap_or(1),
                request.value,
                DistanceUnit::parse(unit),
                request.flight_type.as_deref().unwrap_or(DEFAULT_FLIGHT),
            ),
            ActivityKind::Diet => self.calculate_diet(
                request.value,
                request
                    .diet_type
                    .as_deref()
                    .unwrap_or(crate::services::factors::DEFAULT_DIET),
            ),
        };

        Ok(calculation)
    }
}
