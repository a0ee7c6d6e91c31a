// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reduction tips selected from a static catalog.
//!
//! Two ranking strategies are available:
//! - [`SuggestionStrategy::Category`] (default): the user's three highest
//!   emitting categories, in descending order, each contributing its tips.
//! - [`SuggestionStrategy::Activity`]: activities above the user's mean CO2,
//!   matched to tips by keywords in the activity name.
//!
//! Both return at most [`MAX_SUGGESTIONS`] tips.

use crate::db::{total_emission, CarbonStore};
use crate::error::{AppError, Result};
use crate::models::{Activity, CategoryEmissionResult, CategoryKind, Suggestion};
use std::str::FromStr;

pub const MAX_SUGGESTIONS: usize = 5;
pub const TOP_CATEGORIES: usize = 3;

type Tip = (&'static str, &'static str);

const TRANSPORTATION_TIPS: &[Tip] = &[
    (
        "Use Public Transport",
        "Try taking the bus or train instead of driving to reduce emissions by up to 50%.",
    ),
    (
        "Carpool",
        "Share rides with colleagues or friends to cut transportation emissions.",
    ),
    (
        "Walk or Bike",
        "For short distances, consider walking or biking instead of driving.",
    ),
];

const DIET_TIPS: &[Tip] = &[
    (
        "Plant-Based Meals",
        "Try incorporating more plant-based meals to significantly reduce dietary emissions.",
    ),
    (
        "Local Produce",
        "Buy local and seasonal foods to reduce transportation emissions.",
    ),
    (
        "Reduce Food Waste",
        "Plan meals and store food properly to minimize waste.",
    ),
];

const ENERGY_TIPS: &[Tip] = &[
    (
        "Energy Efficient Appliances",
        "Use energy-efficient appliances and turn them off when not in use.",
    ),
    (
        "LED Lighting",
        "Switch to LED bulbs which use 75% less energy.",
    ),
    (
        "Smart Thermostat",
        "Use a programmable thermostat to optimize heating and cooling.",
    ),
];

const SHOPPING_TIPS: &[Tip] = &[
    (
        "Buy Second-Hand",
        "Purchase used items to reduce manufacturing emissions.",
    ),
    (
        "Quality Over Quantity",
        "Invest in durable products that last longer.",
    ),
];

const WATER_TIPS: &[Tip] = &[
    (
        "Shorter Showers",
        "Reduce shower time to save water and energy.",
    ),
    ("Fix Leaks", "Repair leaky faucets to prevent water waste."),
];

const FALLBACK_TIP: Tip = (
    "General Tip",
    "Monitor your activities regularly to identify emission hotspots.",
);

const GENERIC_TIPS: &[Tip] = &[
    FALLBACK_TIP,
    (
        "Set a Reduction Goal",
        "Pick one category and aim to cut its emissions by 10% next month.",
    ),
    (
        "Log Consistently",
        "Record activities daily so trends and hotspots show up sooner.",
    ),
];

/// Name keywords mapped to the catalog they draw tips from.
const ACTIVITY_KEYWORDS: &[(&str, CategoryKind)] = &[
    ("car", CategoryKind::Transportation),
    ("drive", CategoryKind::Transportation),
    ("commute", CategoryKind::Transportation),
    ("flight", CategoryKind::Transportation),
    ("fly", CategoryKind::Transportation),
    ("taxi", CategoryKind::Transportation),
    ("beef", CategoryKind::Diet),
    ("meat", CategoryKind::Diet),
    ("meal", CategoryKind::Diet),
    ("dinner", CategoryKind::Diet),
    ("lunch", CategoryKind::Diet),
    ("electric", CategoryKind::Energy),
    ("heating", CategoryKind::Energy),
    ("gas", CategoryKind::Energy),
    ("air condition", CategoryKind::Energy),
    ("shop", CategoryKind::Shopping),
    ("clothes", CategoryKind::Shopping),
    ("purchase", CategoryKind::Shopping),
    ("shower", CategoryKind::Water),
    ("water", CategoryKind::Water),
    ("bath", CategoryKind::Water),
];

/// Catalog entries for a category; `None` means the generic fallback applies.
fn catalog(kind: CategoryKind) -> Option<&'static [Tip]> {
    match kind {
        CategoryKind::Transportation => Some(TRANSPORTATION_TIPS),
        CategoryKind::Diet => Some(DIET_TIPS),
        CategoryKind::Energy => Some(ENERGY_TIPS),
        CategoryKind::Shopping => Some(SHOPPING_TIPS),
        CategoryKind::Water => Some(WATER_TIPS),
        CategoryKind::Waste => None,
    }
}

fn tips_for_category(category_id: u32) -> Vec<Suggestion> {
    match CategoryKind::from_id(category_id).and_then(catalog) {
        Some(tips) => tips
            .iter()
            .map(|(title, description)| Suggestion::new(title, description, Some(category_id)))
            .collect(),
        None => vec![Suggestion::new(
            FALLBACK_TIP.0,
            FALLBACK_TIP.1,
            Some(category_id),
        )],
    }
}

fn keyword_category(activity_name: &str) -> Option<CategoryKind> {
    let name = activity_name.to_lowercase();
    ACTIVITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, kind)| *kind)
}

/// Ranking strategy for suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionStrategy {
    #[default]
    Category,
    Activity,
}

impl FromStr for SuggestionStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "activity" => Ok(Self::Activity),
            other => Err(AppError::BadRequest(format!(
                "Unknown suggestion strategy: {}",
                other
            ))),
        }
    }
}

/// Selects tips for a user from aggregated emissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionEngine {
    strategy: SuggestionStrategy,
}

impl SuggestionEngine {
    pub fn new(strategy: SuggestionStrategy) -> Self {
        Self { strategy }
    }

    /// Tips for the highest-emitting categories, highest first.
    pub fn by_category(totals: &[CategoryEmissionResult]) -> Vec<Suggestion> {
        let mut ranked: Vec<&CategoryEmissionResult> = totals.iter().collect();
        ranked.sort_by(|a, b| b.total_emission.total_cmp(&a.total_emission));

        ranked
            .into_iter()
            .take(TOP_CATEGORIES)
            .flat_map(|c| tips_for_category(c.category_id))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Tips for activities emitting more than the user's mean.
    ///
    /// Falls back to generic tips when no above-mean activity matches a
    /// keyword. Returns nothing for a user without activities.
    pub fn by_activity(activities: &[Activity]) -> Vec<Suggestion> {
        if activities.is_empty() {
            return Vec::new();
        }

        let mean = total_emission(activities) / activities.len() as f64;

        let mut above: Vec<&Activity> = activities
            .iter()
            .filter(|a| a.co2_result > mean)
            .collect();
        above.sort_by(|a, b| b.co2_result.total_cmp(&a.co2_result));

        let mut suggestions: Vec<Suggestion> = Vec::new();
        for activity in above {
            let Some(kind) = keyword_category(&activity.activity_name) else {
                continue;
            };
            for suggestion in tips_for_category(kind.id()) {
                if !suggestions.iter().any(|s| s.title == suggestion.title) {
                    suggestions.push(suggestion);
                }
            }
        }

        if suggestions.is_empty() {
            suggestions = GENERIC_TIPS
                .iter()
                .map(|(title, description)| Suggestion::new(title, description, None))
                .collect();
        }

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// Tips for a user using the configured strategy.
    pub async fn suggest(&self, store: &dyn CarbonStore, user_id: u64) -> Result<Vec<Suggestion>> {
        let suggestions = match self.strategy {
            SuggestionStrategy::Category => {
                Self::by_category(&store.category_emissions(user_id).await?)
            }
            SuggestionStrategy::Activity => {
                Self::by_activity(&store.list_activities(user_id).await?)
            }
        };

        tracing::debug!(
            user_id,
            strategy = ?self.strategy,
            count = suggestions.len(),
            "Selected suggestions"
        );
        Ok(suggestions)
    }
}
