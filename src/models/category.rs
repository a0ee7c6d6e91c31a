// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emission categories and per-category aggregates.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// An activity category with its flat emission factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Category {
    pub category_id: u32,
    pub name: String,
    /// kg CO2 per `unit`
    pub emission_factor: f64,
    pub unit: String,
}

/// The six categories of the base schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Transportation,
    Diet,
    Energy,
    Shopping,
    Waste,
    Water,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 6] = [
        CategoryKind::Transportation,
        CategoryKind::Diet,
        CategoryKind::Energy,
        CategoryKind::Shopping,
        CategoryKind::Waste,
        CategoryKind::Water,
    ];

    pub fn from_id(category_id: u32) -> Option<Self> {
        match category_id {
            1 => Some(Self::Transportation),
            2 => Some(Self::Diet),
            3 => Some(Self::Energy),
            4 => Some(Self::Shopping),
            5 => Some(Self::Waste),
            6 => Some(Self::Water),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Transportation => 1,
            Self::Diet => 2,
            Self::Energy => 3,
            Self::Shopping => 4,
            Self::Waste => 5,
            Self::Water => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Transportation => "Transportation",
            Self::Diet => "Diet",
            Self::Energy => "Energy",
            Self::Shopping => "Shopping",
            Self::Waste => "Waste",
            Self::Water => "Water",
        }
    }

    fn default_factor(self) -> (f64, &'static str) {
        match self {
            Self::Transportation => (0.19, "km"),
            Self::Diet => (1.8, "meal"),
            Self::Energy => (0.475, "kWh"),
            Self::Shopping => (0.5, "USD"),
            Self::Waste => (0.57, "kg"),
            Self::Water => (0.34, "m3"),
        }
    }
}

impl Category {
    /// Categories seeded into a fresh store.
    pub fn base_schema() -> Vec<Category> {
        CategoryKind::ALL
            .iter()
            .map(|kind| {
                let (emission_factor, unit) = kind.default_factor();
                Category {
                    category_id: kind.id(),
                    name: kind.name().to_string(),
                    emission_factor,
                    unit: unit.to_string(),
                }
            })
            .collect()
    }
}

/// Total emission of one user's activities in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryEmissionResult {
    pub category_id: u32,
    pub category_name: String,
    pub total_emission: f64,
}
