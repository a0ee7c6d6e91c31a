// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and session routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, session_token, verify_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::{NewUser, User};
use crate::services::password::{hash_password, verify_password};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/status", get(status))
}

fn validate_username(username: &str) -> std::result::Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_chars");
        err.message =
            Some("Username must contain only letters, numbers, and underscores".into());
        Err(err)
    }
}

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters long"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(custom(function = "validate_not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "validate_not_blank", message = "Last name is required"))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// Create an account.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    // Keep PBKDF2 off the async workers.
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(e.into()))?;

    let user = state
        .store
        .create_user(NewUser {
            username: req.username,
            password_hash,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            created_at: format_utc_rfc3339(chrono::Utc::now()),
        })
        .await?;

    tracing::info!(user_id = user.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.user_id,
        }),
    ))
}

/// Verify credentials and start a session.
///
/// The token is both set as an HttpOnly cookie and returned in the body for
/// clients that send it as a Bearer header.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    req.validate()?;

    let user = state
        .store
        .find_user_by_username(&req.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let stored = user.password_hash.clone();
    let password = req.password;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!(user_id = user.user_id, error = %e, "Stored password hash unreadable");
            AppError::InvalidCredentials
        })?;

    if !valid {
        tracing::info!(user_id = user.user_id, "Login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(user.user_id, &state.config.jwt_signing_key)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));

    tracing::info!(user_id = user.user_id, "User logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user: user.into(),
        }),
    ))
}

/// End the session by clearing the cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
}

/// Report whether the caller holds a valid session.
async fn status(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>> {
    let user_id = session_token(&jar, &headers)
        .and_then(|token| verify_jwt(&token, &state.config.jwt_signing_key).ok());

    let user = match user_id {
        Some(user_id) => state.store.get_user(user_id).await?,
        None => None,
    };

    Ok(Json(StatusResponse {
        authenticated: user.is_some(),
        user: user.map(UserProfile::from),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register_request("ada_l", "secret1").validate().is_ok());
        assert!(register_request("ad", "secret1").validate().is_err());
        assert!(register_request("ada-l", "secret1").validate().is_err());
        assert!(register_request("ada", "short").validate().is_err());

        let mut blank = register_request("ada", "secret1");
        blank.last_name = "  ".to_string();
        assert!(blank.validate().is_err());
    }
}
