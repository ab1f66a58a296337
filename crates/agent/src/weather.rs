//! Open-Meteo geocoding and forecast client

use chrono::NaiveDate;
use esap_config::WeatherConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather service returned {0}")]
    Status(u16),

    #[error("malformed forecast: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;

/// WMO weather interpretation code to text
pub fn condition_for(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        95 => "Thunderstorm",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub conditions: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    /// e.g. "Monday, January 6, 2025"
    pub day: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation_chance: f64,
    pub condition: String,
    pub location: String,
}

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Location>,
}

#[derive(Deserialize)]
struct CurrentResponse {
    current: CurrentBlock,
}

#[derive(Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_gusts_10m: f64,
    weather_code: i64,
}

#[derive(Deserialize)]
struct DailyResponse {
    daily: DailyBlock,
}

#[derive(Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    // null for days the model has no estimate for
    precipitation_probability_mean: Vec<Option<f64>>,
    weathercode: Vec<i64>,
}

pub struct WeatherClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherClient {
    pub fn new(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        })
    }

    pub fn from_config(config: &WeatherConfig, timeout: Duration) -> Result<Self> {
        Self::new(&config.geocoding_url, &config.forecast_url, timeout)
    }

    /// First geocoding match for `name`
    pub async fn geocode(&self, name: &str) -> Result<Location> {
        debug!("geocoding '{}'", name);
        let response = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", name), ("count", "1")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: GeocodingResponse = response.json().await?;
        body.results
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(name.to_string()))
    }

    pub async fn current(&self, place: &str) -> Result<CurrentWeather> {
        let location = self.geocode(place).await?;
        debug!("current weather for {} ({}, {})", location.name, location.latitude, location.longitude);

        let response = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                (
                    "current",
                    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_gusts_10m,weather_code"
                        .to_string(),
                ),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: CurrentResponse = response.json().await?;
        let c = body.current;
        Ok(CurrentWeather {
            temperature: c.temperature_2m,
            feels_like: c.apparent_temperature,
            humidity: c.relative_humidity_2m,
            wind_speed: c.wind_speed_10m,
            wind_gust: c.wind_gusts_10m,
            conditions: condition_for(c.weather_code).to_string(),
            location: location.name,
        })
    }

    pub async fn daily_forecast(&self, city: &str) -> Result<Vec<DailyForecast>> {
        let location = self.geocode(city).await?;
        debug!("daily forecast for {}", location.name);

        let response = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_probability_mean,weathercode"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: DailyResponse = response.json().await?;
        build_forecast(body.daily, &location.name)
    }
}

fn build_forecast(daily: DailyBlock, location: &str) -> Result<Vec<DailyForecast>> {
    let days = daily.time.len();
    if daily.temperature_2m_max.len() != days
        || daily.temperature_2m_min.len() != days
        || daily.precipitation_probability_mean.len() != days
        || daily.weathercode.len() != days
    {
        return Err(WeatherError::Malformed("daily series lengths differ".to_string()));
    }

    daily
        .time
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| WeatherError::Malformed(format!("date '{date}': {e}")))?;
            Ok(DailyForecast {
                day: parsed.format("%A, %B %-d, %Y").to_string(),
                date,
                max_temp: daily.temperature_2m_max[i],
                min_temp: daily.temperature_2m_min[i],
                precipitation_chance: daily.precipitation_probability_mean[i].unwrap_or(0.0),
                condition: condition_for(daily.weathercode[i]).to_string(),
                location: location.to_string(),
            })
        })
        .collect()
}
