// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-weather lookup used to enrich calculation responses.
//!
//! Uses OpenWeather when an API key is configured and falls back to
//! deterministic mock data when the key is missing or the call fails.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const MOCK_DESCRIPTIONS: [&str; 4] = ["clear sky", "few clouds", "scattered clouds", "broken clouds"];

pub const DEFAULT_CITY: &str = "New York";
pub const DEFAULT_COUNTRY: &str = "us";

/// Weather conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub description: String,
    /// Percent
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// "openweather" or "mock"
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct OwResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwCondition>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

impl From<OwResponse> for WeatherReport {
    fn from(r: OwResponse) -> Self {
        Self {
            city: r.name,
            country: r.sys.country,
            temperature: r.main.temp,
            description: r
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            humidity: r.main.humidity,
            wind_speed: r.wind.speed,
            source: "openweather".to_string(),
        }
    }
}

/// OpenWeather client with mock fallback.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Current weather for `city`. Never fails; degrades to mock data.
    pub async fn current(&self, city: &str, country: &str) -> WeatherReport {
        let Some(api_key) = &self.api_key else {
            return mock_weather(city);
        };

        match self.fetch(city, country, api_key).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(city, error = %e, "Weather lookup failed, using mock data");
                mock_weather(city)
            }
        }
    }

    async fn fetch(&self, city: &str, country: &str, api_key: &str) -> anyhow::Result<WeatherReport> {
        let url = format!("{}/weather", self.base_url);
        let location = format!("{},{}", city, country);

        let response: OwResponse = self
            .http
            .get(&url)
            .query(&[
                ("q", location.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.into())
    }
}

/// Plausible weather derived from the city name, stable across calls.
pub fn mock_weather(city: &str) -> WeatherReport {
    let seed = city
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));

    WeatherReport {
        city: city.to_string(),
        country: "US".to_string(),
        temperature: f64::from(15 + seed % 21),
        description: MOCK_DESCRIPTIONS[(seed % 4) as usize].to_string(),
        humidity: f64::from(40 + (seed / 7) % 41),
        wind_speed: f64::from(1 + (seed / 13) % 11),
        source: "mock".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_is_deterministic_and_in_range() {
        let a = mock_weather("Dublin");
        let b = mock_weather("Dublin");
        assert_eq!(a, b);
        assert_eq!(a.source, "mock");
        assert!((15.0..=35.0).contains(&a.temperature));
        assert!((40.0..=80.0).contains(&a.humidity));
        assert!((1.0..=11.0).contains(&a.wind_speed));
    }

    #[tokio::test]
    async fn test_missing_key_uses_mock() {
        let service = WeatherService::new(None);
        let report = service.current("Paris", "fr").await;
        assert_eq!(report.source, "mock");
        assert_eq!(report.city, "Paris");
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let service =
            WeatherService::new(Some("key".to_string())).with_base_url("http://127.0.0.1:9");
        let report = service.current("Oslo", "no").await;
        assert_eq!(report.source, "mock");
    }

    #[test]
    fn test_parse_openweather_response() {
        let body = r#"{
            "name": "London",
            "sys": {"country": "GB"},
            "main": {"temp": 12.5, "humidity": 81},
            "weather": [{"description": "light rain"}],
            "wind": {"speed": 4.1}
        }"#;
        let report: WeatherReport = serde_json::from_str::<OwResponse>(body).unwrap().into();
        assert_eq!(report.city, "London");
        assert_eq!(report.country, "GB");
        assert_eq!(report.description, "light rain");
        assert_eq!(report.source, "openweather");
    }
}
