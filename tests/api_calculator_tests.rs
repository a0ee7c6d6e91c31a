// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calculator, footprint and weather API tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, empty_request, json_request};

const USER: u64 = 77;

#[tokio::test]
async fn test_calculator_routes_require_auth() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/carbon/vehicle",
            &state,
            None,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_vehicle_defaults() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/carbon/vehicle",
            &state,
            Some(USER),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["carbon_kg"], 1.9);
    assert_eq!(body["data"]["activity"], "transport");
    assert_eq!(body["data"]["vehicle_type"], "car_petrol_medium");
    assert_eq!(body["data"]["calculation"], "10 km × 0.19 kg CO2/km");
}

#[tokio::test]
async fn test_vehicle_shared_ride() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/carbon/vehicle",
            &state,
            Some(USER),
            json!({"distance": 100, "vehicleType": "car_petrol_medium", "passengers": 4}),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["carbon_kg"], 4.75);
    assert_eq!(
        body["data"]["calculation"],
        "100 km × 0.19 kg CO2/km ÷ 4 passengers"
    );
}

#[tokio::test]
async fn test_electricity_flight_diet() {
    let (app, state) = create_test_app();

    let cases = [
        (
            "/api/external/carbon/electricity",
            json!({"electricityValue": 100, "country": "FR"}),
            5.8,
            "electricity",
        ),
        ("/api/external/carbon/flight", json!({}), 25.0, "flight"),
        (
            "/api/external/carbon/diet",
            json!({"meals": 3, "dietType": "vegan"}),
            2.1,
            "diet",
        ),
    ];

    for (uri, request, expected, activity) in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", uri, &state, Some(USER), request))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let body = body_json(response).await;
        assert_eq!(body["carbon_kg"], expected, "{}", uri);
        assert_eq!(body["data"]["activity"], activity);
        assert_eq!(body["data"]["source"], "scientific_data");
    }
}

#[tokio::test]
async fn test_footprint_batch_with_unknown_entry() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/carbon/footprint",
            &state,
            Some(USER),
            json!({
                "activities": [
                    {"type": "transport", "distance": 50},
                    {"type": "teleport", "distance": 1000},
                    {"type": "diet", "meals": 2}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total_carbon_kg"], 13.1);
    assert_eq!(body["equivalent_trees"], 0.6);

    let breakdown = body["breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 3);
    assert_eq!(breakdown[0]["type"], "transport");
    assert_eq!(breakdown[1]["type"], "unknown");
    assert_eq!(breakdown[1]["carbon_kg"], 0.0);
    assert_eq!(breakdown[1]["details"], json!({"activity": "unknown"}));
    assert_eq!(breakdown[2]["carbon_kg"], 3.6);
}

#[tokio::test]
async fn test_empty_footprint_is_positive_zero() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/carbon/footprint",
            &state,
            Some(USER),
            json!({"activities": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_carbon_kg"].to_string(), "0.0");
    assert_eq!(body["equivalent_trees"].to_string(), "0.0");
    assert_eq!(body["breakdown"], json!([]));
}

#[tokio::test]
async fn test_footprint_requires_activities() {
    let (app, state) = create_test_app();

    for request in [json!({}), json!({"activities": "nope"})] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/external/carbon/footprint",
                &state,
                Some(USER),
                request,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
    }
}

#[tokio::test]
async fn test_methods_lists_factor_table() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/external/carbon/methods",
            &state,
            Some(USER),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["methods"]["transport"]["car_petrol_medium"], 0.19);
    assert_eq!(body["methods"]["electricity"]["world_average"], 0.475);
    assert_eq!(body["methods"]["diet"]["average"], 1.8);
}

#[tokio::test]
async fn test_combined_rejects_unknown_activity_type() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/calculate-footprint",
            &state,
            Some(USER),
            json!({"activityType": "hovercraft", "value": 10}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unknown_activity_type");
    assert_eq!(body["details"], "hovercraft");
}

#[tokio::test]
async fn test_combined_with_weather() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/calculate-footprint",
            &state,
            Some(USER),
            json!({
                "activityType": "transport",
                "value": 20,
                "unit": "km",
                "vehicleType": "bus",
                "location": "Chicago"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["carbon_emission"]["carbon_kg"], 1.8);
    assert_eq!(body["weather_data"]["city"], "Chicago");
    assert_eq!(body["weather_data"]["source"], "mock");
    assert_eq!(body["activity"]["type"], "transport");
    assert_eq!(body["activity"]["vehicleType"], "bus");
}

#[tokio::test]
async fn test_combined_without_location_skips_weather() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/external/calculate-footprint",
            &state,
            Some(USER),
            json!({"activityType": "electricity", "value": 2, "unit": "mwh", "country": "GB"}),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["carbon_emission"]["carbon_kg"], 466.0);
    assert!(body["weather_data"].is_null());
}

#[tokio::test]
async fn test_current_weather_defaults() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/external/weather/current",
            &state,
            Some(USER),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["city"], "New York");
    assert_eq!(body["data"]["source"], "mock");
}
