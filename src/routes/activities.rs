// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging routes (require authentication).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, ActivityInput};
use crate::services::ActivityMutation;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route(
            "/api/activities/{id}",
            put(update_activity).delete(delete_activity),
        )
}

/// Mutation result with a human-readable message.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub message: String,
    #[serde(flatten)]
    pub mutation: ActivityMutation,
}

impl ActivityResponse {
    fn new(message: &str, mutation: ActivityMutation) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
            mutation,
        })
    }
}

/// Unwrap and validate an activity body.
///
/// Malformed JSON (bad dates, wrong types) is reported as a validation
/// failure like any other invalid field.
fn validated(body: std::result::Result<Json<ActivityInput>, JsonRejection>) -> Result<ActivityInput> {
    let Json(input) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    input.validate()?;
    Ok(input)
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Activity>>> {
    Ok(Json(state.activities.list(user.user_id).await?))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ActivityInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    let input = validated(body)?;
    let mutation = state.activities.create(user.user_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        ActivityResponse::new("Activity logged successfully", mutation),
    ))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
    body: std::result::Result<Json<ActivityInput>, JsonRejection>,
) -> Result<Json<ActivityResponse>> {
    let input = validated(body)?;
    let mutation = state
        .activities
        .update(user.user_id, activity_id, &input)
        .await?;
    Ok(ActivityResponse::new("Activity updated successfully", mutation))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivityResponse>> {
    let mutation = state.activities.delete(user.user_id, activity_id).await?;
    Ok(ActivityResponse::new("Activity deleted successfully", mutation))
}
