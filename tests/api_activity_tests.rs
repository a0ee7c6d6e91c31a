// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging and dashboard API tests over the in-memory store.

use axum::http::StatusCode;
use carbon_tracker::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, empty_request, json_request};

const USER: u64 = 501;
const OTHER_USER: u64 = 502;

fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .map(|v| (v - expected).abs() < 1e-9)
        .unwrap_or(false)
}

fn activity_body(name: &str, category_id: u32, quantity: f64, start_date: &str) -> Value {
    json!({
        "activity_name": name,
        "category_id": category_id,
        "quantity": quantity,
        "unit": "unit",
        "start_date": start_date
    })
}

async fn create(app: &axum::Router, state: &AppState, user_id: u64, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/activities", state, Some(user_id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

#[tokio::test]
async fn test_create_computes_co2_and_rolls_up() {
    let (app, state) = create_test_app();

    let body = create(
        &app,
        &state,
        USER,
        activity_body("Drive to work", 1, 50.0, "2024-03-01"),
    )
    .await;

    assert_eq!(body["message"], "Activity logged successfully");
    assert!(approx(&body["CO2_result"], 9.5));
    assert_eq!(body["report"]["status"], "synced");
    assert!(approx(&body["report"]["total_emission"], 9.5));

    let body = create(
        &app,
        &state,
        USER,
        activity_body("Dinner", 2, 2.0, "2024-03-02"),
    )
    .await;
    assert!(approx(&body["CO2_result"], 3.6));
    assert!(approx(&body["report"]["total_emission"], 13.1));

    let report = state.store.get_report(USER).await.unwrap().unwrap();
    assert!((report.total_emission - 13.1).abs() < 1e-9);
}

#[tokio::test]
async fn test_end_date_defaults_to_start_date() {
    let (app, state) = create_test_app();

    create(&app, &state, USER, activity_body("Shower", 6, 1.0, "2024-03-05")).await;

    let response = app
        .oneshot(empty_request("GET", "/api/activities", &state, Some(USER)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["end_date"], "2024-03-05");
    assert_eq!(body[0]["unit"], "unit");
}

#[tokio::test]
async fn test_list_is_per_user_newest_first() {
    let (app, state) = create_test_app();

    create(&app, &state, USER, activity_body("Old", 1, 1.0, "2024-01-01")).await;
    create(&app, &state, USER, activity_body("New", 1, 1.0, "2024-02-01")).await;
    create(&app, &state, OTHER_USER, activity_body("Theirs", 1, 1.0, "2024-03-01")).await;

    let response = app
        .oneshot(empty_request("GET", "/api/activities", &state, Some(USER)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["activity_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["New", "Old"]);
}

#[tokio::test]
async fn test_update_recomputes_and_rolls_up() {
    let (app, state) = create_test_app();

    let created = create(&app, &state, USER, activity_body("Bus", 1, 10.0, "2024-03-01")).await;
    let id = created["activity_id"].as_u64().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/activities/{}", id),
            &state,
            Some(USER),
            activity_body("Electricity bill", 3, 100.0, "2024-03-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["activity_id"], id);
    assert!(approx(&body["CO2_result"], 47.5));
    assert!(approx(&body["report"]["total_emission"], 47.5));

    let stored = state.store.get_activity(id).await.unwrap().unwrap();
    assert_eq!(stored.category_id, 3);
    assert_eq!(stored.activity_name, "Electricity bill");
}

#[tokio::test]
async fn test_foreign_activity_is_not_found() {
    let (app, state) = create_test_app();

    let created = create(&app, &state, USER, activity_body("Mine", 1, 10.0, "2024-03-01")).await;
    let id = created["activity_id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/activities/{}", id),
            &state,
            Some(OTHER_USER),
            activity_body("Hijacked", 1, 999.0, "2024-03-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/activities/{}", id),
            &state,
            Some(OTHER_USER),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request(
            "DELETE",
            "/api/activities/424242",
            &state,
            Some(USER),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Untouched, and no report was created for the other user.
    let stored = state.store.get_activity(id).await.unwrap().unwrap();
    assert_eq!(stored.activity_name, "Mine");
    assert!(state.store.get_report(OTHER_USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_all_leaves_zero_total() {
    let (app, state) = create_test_app();

    let mut ids = Vec::new();
    for (category, quantity) in [(1, 12.3), (2, 4.0), (3, 7.77)] {
        let body = create(
            &app,
            &state,
            USER,
            activity_body("Something", category, quantity, "2024-03-01"),
        )
        .await;
        ids.push(body["activity_id"].as_u64().unwrap());
    }

    let mut last = Value::Null;
    for id in ids {
        let response = app
            .clone()
            .oneshot(empty_request(
                "DELETE",
                &format!("/api/activities/{}", id),
                &state,
                Some(USER),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        last = body_json(response).await;
    }

    assert_eq!(last["message"], "Activity deleted successfully");
    assert_eq!(last["report"]["total_emission"].as_f64(), Some(0.0));

    let response = app
        .oneshot(empty_request("GET", "/api/emissions/report", &state, Some(USER)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total_emission"].as_f64(), Some(0.0));
    assert_eq!(body["total_emission"].to_string(), "0.0");
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_invalid_activity_rejected_before_write() {
    let (app, state) = create_test_app();

    let bad_bodies = [
        activity_body("Unknown category", 9, 1.0, "2024-03-01"),
        activity_body("Negative", 1, -1.0, "2024-03-01"),
        activity_body("", 1, 1.0, "2024-03-01"),
        json!({
            "activity_name": "Backwards",
            "category_id": 1,
            "quantity": 1.0,
            "unit": "km",
            "start_date": "2024-03-02",
            "end_date": "2024-03-01"
        }),
        json!({"activity_name": "Missing fields"}),
        json!({
            "activity_name": "Bad date",
            "category_id": 1,
            "quantity": 1.0,
            "unit": "km",
            "start_date": "yesterday"
        }),
    ];

    for body in bad_bodies {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/activities", &state, Some(USER), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_failed");
    }

    assert!(state.store.list_activities(USER).await.unwrap().is_empty());
    assert!(state.store.get_report(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_summary_trend_and_categories() {
    let (app, state) = create_test_app();

    create(&app, &state, USER, activity_body("Commute", 1, 100.0, &today())).await;
    create(&app, &state, USER, activity_body("Lunch", 2, 1.0, &today())).await;
    create(&app, &state, USER, activity_body("Ancient", 4, 10.0, "2001-01-01")).await;

    let response = app
        .oneshot(empty_request("GET", "/api/emissions/summary", &state, Some(USER)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let trend = body["weekly_trend"].as_array().unwrap();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0]["date"], today());
    assert!(approx(&trend[0]["total_emission"], 20.8));

    let categories = body["by_category"].as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0]["category_name"], "Transportation");
    assert!(approx(&body["total_emission"], 25.8));
    assert_eq!(body["activity_count"], 3);
}

#[tokio::test]
async fn test_suggestions_follow_highest_category() {
    let (app, state) = create_test_app();

    // Without activities there is nothing to suggest.
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/emissions/suggestions", &state, Some(USER)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["suggestions"], json!([]));

    create(&app, &state, USER, activity_body("Steak night", 2, 10.0, "2024-03-01")).await;
    create(&app, &state, USER, activity_body("Scooter", 1, 5.0, "2024-03-01")).await;

    let response = app
        .oneshot(empty_request("GET", "/api/emissions/suggestions", &state, Some(USER)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let suggestions = body["suggestions"].as_array().unwrap();

    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0]["title"], "Plant-Based Meals");
    assert_eq!(suggestions[3]["title"], "Use Public Transport");
}
