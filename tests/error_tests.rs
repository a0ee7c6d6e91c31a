// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use carbon_tracker::error::AppError;

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED, "invalid_token"),
        (
            AppError::InvalidCredentials,
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
        ),
        (
            AppError::NotFound("x".to_string()),
            StatusCode::NOT_FOUND,
            "not_found",
        ),
        (
            AppError::InvalidCategory(12),
            StatusCode::BAD_REQUEST,
            "invalid_category",
        ),
        (
            AppError::UnknownActivityType("boat".to_string()),
            StatusCode::BAD_REQUEST,
            "unknown_activity_type",
        ),
        (
            AppError::Conflict("taken".to_string()),
            StatusCode::CONFLICT,
            "conflict",
        ),
        (
            AppError::Database("down".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "database_error",
        ),
    ];

    for (err, status, code) in cases {
        assert_eq!(err.status_and_code(), (status, code));
    }
}

#[tokio::test]
async fn test_internal_details_not_leaked() {
    let response = AppError::Database("password=hunter2 in connection string".to_string())
        .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({"error": "database_error"}));
}

#[tokio::test]
async fn test_invalid_category_details() {
    let response = AppError::InvalidCategory(12).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "invalid_category");
    assert_eq!(body["details"], "No emission factor for category 12");
}
