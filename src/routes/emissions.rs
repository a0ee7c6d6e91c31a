// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard routes: categories, summary, suggestions and the user report.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Category, Suggestion};
use crate::services::EmissionsSummary;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// Category listing (public).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/emissions/categories", get(list_categories))
}

/// Per-user dashboard data (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/emissions/summary", get(get_summary))
        .route("/api/emissions/suggestions", get(get_suggestions))
        .route("/api/emissions/report", get(get_report))
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Rolled-up total for the current user.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub user_id: u64,
    pub total_emission: f64,
    /// None until the first activity mutation
    pub updated_at: Option<String>,
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.store.list_categories().await?))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EmissionsSummary>> {
    let activities = state.store.list_activities(user.user_id).await?;
    let categories = state.store.list_categories().await?;
    let today = chrono::Utc::now().date_naive();

    Ok(Json(EmissionsSummary::build(
        &activities,
        &categories,
        today,
        state.config.summary_window_days,
    )))
}

async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SuggestionsResponse>> {
    let suggestions = state
        .suggestions
        .suggest(state.store.as_ref(), user.user_id)
        .await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ReportResponse>> {
    let report = state.store.get_report(user.user_id).await?;

    Ok(Json(match report {
        Some(report) => ReportResponse {
            user_id: report.user_id,
            total_emission: report.total_emission,
            updated_at: Some(report.updated_at),
        },
        None => ReportResponse {
            user_id: user.user_id,
            total_emission: 0.0,
            updated_at: None,
        },
    }))
}
