// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch footprint aggregation over mixed activity types.

use crate::services::calculator::{
    round_to, ActivityKind, Calculation, CalculationDetails, CarbonCalculator, DistanceUnit,
    EnergyUnit, DEFAULT_COUNTRY, DEFAULT_FLIGHT, DEFAULT_VEHICLE,
};
use crate::services::factors::DEFAULT_DIET;
use serde::{Deserialize, Serialize};

/// kg CO2 absorbed by one tree in a year.
pub const KG_CO2_PER_TREE_YEAR: f64 = 21.77;

/// Type tag used for breakdown entries whose input type was not recognised.
pub const UNKNOWN_TYPE: &str = "unknown";

/// One entry of a footprint batch. Fields irrelevant to `type` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintActivity {
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub distance: f64,
    /// Distance unit (transport, flight) or energy unit (electricity)
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub usage: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub flight_type: Option<String>,
    #[serde(default)]
    pub meals: f64,
    #[serde(default)]
    pub diet_type: Option<String>,
}

/// Per-entry result in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintEntry {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub carbon_kg: f64,
    pub details: CalculationDetails,
}

/// Aggregate over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFootprint {
    pub success: bool,
    pub total_carbon_kg: f64,
    pub breakdown: Vec<FootprintEntry>,
    /// Trees needed for a year to absorb the total, rounded to 1 decimal
    pub equivalent_trees: f64,
}

/// Sums calculator results over a batch of activities.
#[derive(Debug, Clone, Default)]
pub struct FootprintAggregator {
    calculator: CarbonCalculator,
}

impl FootprintAggregator {
    pub fn new(calculator: CarbonCalculator) -> Self {
        Self { calculator }
    }

    /// Calculate one batch entry. Unknown types contribute zero.
    pub fn calculate_entry(&self, activity: &FootprintActivity) -> FootprintEntry {
        let unit = activity.unit.as_deref().unwrap_or_default();

        let result = match activity.activity_type.parse::<ActivityKind>() {
            Ok(ActivityKind::Transport) => Some(self.calculator.calculate_transport(
                activity.distance,
                DistanceUnit::parse(unit),
                activity.vehicle_type.as_deref().unwrap_or(DEFAULT_VEHICLE),
                activity.passengers.unwrap_or(1),
            )),
            Ok(ActivityKind::Electricity) => Some(self.calculator.calculate_electricity(
                activity.usage,
                EnergyUnit::parse(unit),
                activity.country.as_deref().unwrap_or(DEFAULT_COUNTRY),
            )),
            Ok(ActivityKind::Flight) => Some(self.calculator.calculate_flight(
                activity.passengers.unwrap_or(1),
                activity.distance,
                DistanceUnit::parse(unit),
                activity.flight_type.as_deref().unwrap_or(DEFAULT_FLIGHT),
            )),
            Ok(ActivityKind::Diet) => Some(self.calculator.calculate_diet(
                activity.meals,
                activity.diet_type.as_deref().unwrap_or(DEFAULT_DIET),
            )),
            Err(_) => None,
        };

        match result {
            Some(Calculation { carbon_kg, data, .. }) => FootprintEntry {
                activity_type: activity.activity_type.clone(),
                carbon_kg,
                details: data,
            },
            None => {
                tracing::debug!(
                    activity_type = %activity.activity_type,
                    "Unknown activity type in footprint batch"
                );
                FootprintEntry {
                    activity_type: UNKNOWN_TYPE.to_string(),
                    carbon_kg: 0.0,
                    details: CalculationDetails::Unknown,
                }
            }
        }
    }

    /// Calculate a batch. The breakdown keeps input order.
    pub fn calculate_daily_footprint(&self, activities: &[FootprintActivity]) -> DailyFootprint {
        let breakdown: Vec<FootprintEntry> = activities
            .iter()
            .map(|activity| self.calculate_entry(activity))
            .collect();

        let total = breakdown
            .iter()
            .fold(0.0, |acc, entry| acc + entry.carbon_kg);

        DailyFootprint {
            success: true,
            total_carbon_kg: round_to(total, 3),
            breakdown,
            equivalent_trees: round_to(total / KG_CO2_PER_TREE_YEAR, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(activity_type: &str) -> FootprintActivity {
        FootprintActivity {
            activity_type: activity_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_batch() {
        let result = FootprintAggregator::default().calculate_daily_footprint(&[]);
        assert!(result.success);
        assert_eq!(result.total_carbon_kg, 0.0);
        assert_eq!(result.equivalent_trees, 0.0);
        assert!(result.breakdown.is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_carbon_kg"].to_string(), "0.0");
        assert_eq!(json["equivalent_trees"].to_string(), "0.0");
    }

    #[test]
    fn test_mixed_batch_preserves_order() {
        let batch = vec![
            FootprintActivity {
                distance: 20.0,
                ..activity("transport")
            },
            FootprintActivity {
                meals: 3.0,
                diet_type: Some("vegan".to_string()),
                ..activity("diet")
            },
            FootprintActivity {
                usage: 10.0,
                country: Some("ZZ".to_string()),
                ..activity("electricity")
            },
        ];

        let result = FootprintAggregator::default().calculate_daily_footprint(&batch);

        let types: Vec<&str> = result
            .breakdown
            .iter()
            .map(|e| e.activity_type.as_str())
            .collect();
        assert_eq!(types, vec!["transport", "diet", "electricity"]);
        // 3.8 + 2.1 + 4.75
        assert_eq!(result.total_carbon_kg, 10.65);
        assert_eq!(result.equivalent_trees, 0.5);
    }

    #[test]
    fn test_unknown_type_contributes_zero_without_aborting() {
        let batch = vec![
            activity("laundry"),
            FootprintActivity {
                meals: 1.0,
                ..activity("diet")
            },
        ];

        let result = FootprintAggregator::default().calculate_daily_footprint(&batch);

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[0].activity_type, UNKNOWN_TYPE);
        assert_eq!(result.breakdown[0].carbon_kg, 0.0);
        assert_eq!(result.breakdown[0].details, CalculationDetails::Unknown);
        assert_eq!(result.total_carbon_kg, 1.8);
    }

    #[test]
    fn test_breakdown_serializes_type_field() {
        let result =
            FootprintAggregator::default().calculate_daily_footprint(&[activity("laundry")]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["breakdown"][0]["type"], "unknown");
        assert_eq!(json["breakdown"][0]["details"]["activity"], "unknown");
    }

    #[test]
    fn test_batch_entry_deserializes_camel_case() {
        let entry: FootprintActivity = serde_json::from_str(
            r#"{"type": "flight", "distance": 300, "passengers": 2, "flightType": "flight_short_haul"}"#,
        )
        .unwrap();
        assert_eq!(entry.activity_type, "flight");
        assert_eq!(entry.flight_type.as_deref(), Some("flight_short_haul"));

        let result = FootprintAggregator::default().calculate_entry(&entry);
        assert_eq!(result.carbon_kg, 108.0);
    }
}
