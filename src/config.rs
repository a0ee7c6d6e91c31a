//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup; the emission factor table is built
//! from them in `main` and shared immutably afterwards.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::suggestions::SuggestionStrategy;

/// Which persistence adapter backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Firestore,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            other => Err(ConfigError::Invalid("STORAGE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    pub storage: StorageBackend,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Optional JSON file replacing the built-in emission factor table
    pub emission_factors_path: Option<PathBuf>,
    /// OpenWeather API key; mock weather is served without it
    pub openweather_api_key: Option<String>,
    pub suggestion_strategy: SuggestionStrategy,
    /// Trailing window (days) of the dashboard daily trend
    pub summary_window_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage = match env::var("STORAGE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StorageBackend::Memory,
        };

        let suggestion_strategy = match env::var("SUGGESTION_STRATEGY") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("SUGGESTION_STRATEGY", v.clone()))?,
            Err(_) => SuggestionStrategy::default(),
        };

        let summary_window_days = match env::var("SUMMARY_WINDOW_DAYS") {
            Ok(v) => v
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or_else(|| ConfigError::Invalid("SUMMARY_WINDOW_DAYS", v.clone()))?,
            Err(_) => 7,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            emission_factors_path: env::var("EMISSION_FACTORS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            suggestion_strategy,
            summary_window_days,
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            emission_factors_path: None,
            openweather_api_key: None,
            suggestion_strategy: SuggestionStrategy::Category,
            summary_window_days: 7,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
