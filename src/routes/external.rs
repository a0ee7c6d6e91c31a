// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calculator and weather routes (require authentication).
//!
//! The per-type endpoints fill missing fields with defaults so a bare `{}`
//! body still produces a sample calculation.

use crate::error::{AppError, Result};
use crate::services::calculator::{
    Calculation, CalculationRequest, DistanceUnit, EnergyUnit, DEFAULT_COUNTRY, DEFAULT_FLIGHT,
    DEFAULT_VEHICLE,
};
use crate::services::factors::{EmissionFactorTable, DEFAULT_DIET};
use crate::services::footprint::{DailyFootprint, FootprintActivity};
use crate::services::weather::{self, WeatherReport};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_VEHICLE_DISTANCE: f64 = 10.0;
const DEFAULT_FLIGHT_DISTANCE: f64 = 100.0;
const DEFAULT_ELECTRICITY_USAGE: f64 = 1.0;
const DEFAULT_MEALS: f64 = 1.0;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/external/carbon/vehicle", post(vehicle))
        .route("/api/external/carbon/electricity", post(electricity))
        .route("/api/external/carbon/flight", post(flight))
        .route("/api/external/carbon/diet", post(diet))
        .route("/api/external/carbon/footprint", post(footprint))
        .route("/api/external/carbon/methods", get(methods))
        .route("/api/external/calculate-footprint", post(calculate_footprint))
        .route("/api/external/weather/current", get(current_weather))
}

// ─── Per-type calculations ───────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    pub distance: Option<f64>,
    pub distance_unit: Option<String>,
    pub vehicle_type: Option<String>,
    pub passengers: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityRequest {
    pub electricity_value: Option<f64>,
    pub electricity_unit: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRequest {
    pub passengers: Option<u32>,
    pub distance: Option<f64>,
    pub distance_unit: Option<String>,
    pub flight_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietRequest {
    pub meals: Option<f64>,
    pub diet_type: Option<String>,
}

/// Unwrap a JSON body, reporting malformed input as a bad request.
fn body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

async fn vehicle(
    State(state): State<Arc<AppState>>,
    req: std::result::Result<Json<VehicleRequest>, JsonRejection>,
) -> Result<Json<Calculation>> {
    let req = body(req)?;
    Ok(Json(state.calculator.calculate_transport(
        req.distance.unwrap_or(DEFAULT_VEHICLE_DISTANCE),
        DistanceUnit::parse(req.distance_unit.as_deref().unwrap_or_default()),
        req.vehicle_type.as_deref().unwrap_or(DEFAULT_VEHICLE),
        req.passengers.unwrap_or(1),
    )))
}

async fn electricity(
    State(state): State<Arc<AppState>>,
    req: std::result::Result<Json<ElectricityRequest>, JsonRejection>,
) -> Result<Json<Calculation>> {
    let req = body(req)?;
    Ok(Json(state.calculator.calculate_electricity(
        req.electricity_value.unwrap_or(DEFAULT_ELECTRICITY_USAGE),
        EnergyUnit::parse(req.electricity_unit.as_deref().unwrap_or_default()),
        req.country.as_deref().unwrap_or(DEFAULT_COUNTRY),
    )))
}

async fn flight(
    State(state): State<Arc<AppState>>,
    req: std::result::Result<Json<FlightRequest>, JsonRejection>,
) -> Result<Json<Calculation>> {
    let req = body(req)?;
    Ok(Json(state.calculator.calculate_flight(
        req.passengers.unwrap_or(1),
        req.distance.unwrap_or(DEFAULT_FLIGHT_DISTANCE),
        DistanceUnit::parse(req.distance_unit.as_deref().unwrap_or_default()),
        req.flight_type.as_deref().unwrap_or(DEFAULT_FLIGHT),
    )))
}

async fn diet(
    State(state): State<Arc<AppState>>,
    req: std::result::Result<Json<DietRequest>, JsonRejection>,
) -> Result<Json<Calculation>> {
    let req = body(req)?;
    Ok(Json(state.calculator.calculate_diet(
        req.meals.unwrap_or(DEFAULT_MEALS),
        req.diet_type.as_deref().unwrap_or(DEFAULT_DIET),
    )))
}

// ─── Batch footprint ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FootprintRequest {
    #[serde(default)]
    pub activities: Option<Vec<FootprintActivity>>,
}

async fn footprint(
    State(state): State<Arc<AppState>>,
    req: std::result::Result<Json<FootprintRequest>, JsonRejection>,
) -> Result<Json<DailyFootprint>> {
    let activities = body(req)?
        .activities
        .ok_or_else(|| AppError::BadRequest("Activities array is required".to_string()))?;

    Ok(Json(state.footprint.calculate_daily_footprint(&activities)))
}

#[derive(Debug, Serialize)]
pub struct MethodsResponse {
    pub success: bool,
    pub methods: EmissionFactorTable,
}

/// The factor table in use, for clients building input forms.
async fn methods(State(state): State<Arc<AppState>>) -> Json<MethodsResponse> {
    Json(MethodsResponse {
        success: true,
        methods: state.calculator.factors().clone(),
    })
}

// ─── Combined calculation + weather ──────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRequest {
    #[serde(flatten)]
    pub calculation: CalculationRequest,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request fields echoed back to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEcho {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub vehicle_type: Option<String>,
    pub passengers: Option<u32>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CombinedResponse {
    pub success: bool,
    pub carbon_emission: Calculation,
    pub weather_data: Option<WeatherReport>,
    pub activity: ActivityEcho,
}

/// One calculation, optionally enriched with weather for `location`.
///
/// An unrecognised `activityType` is rejected.
async fn calculate_footprint(
    State(state): State<Arc<AppState>>,
    req: std::result::Result<Json<CombinedRequest>, JsonRejection>,
) -> Result<Json<CombinedResponse>> {
    let CombinedRequest {
        calculation,
        location,
    } = body(req)?;

    let carbon_emission = state.calculator.calculate(&calculation)?;

    let weather_data = match location.as_deref() {
        Some(city) if !city.trim().is_empty() => {
            Some(state.weather.current(city, weather::DEFAULT_COUNTRY).await)
        }
        _ => None,
    };

    Ok(Json(CombinedResponse {
        success: true,
        carbon_emission,
        weather_data,
        activity: ActivityEcho {
            activity_type: calculation.activity_type,
            value: calculation.value,
            unit: calculation.unit,
            location,
            vehicle_type: calculation.vehicle_type,
            passengers: calculation.passengers,
            country: calculation.country,
        },
    }))
}

// ─── Weather ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub success: bool,
    pub data: WeatherReport,
}

async fn current_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherResponse> {
    let data = state
        .weather
        .current(
            query.city.as_deref().unwrap_or(weather::DEFAULT_CITY),
            query.country.as_deref().unwrap_or(weather::DEFAULT_COUNTRY),
        )
        .await;

    Json(WeatherResponse {
        success: true,
        data,
    })
}
