//! Weather provider passthrough.
//!
//! Forwards a city or coordinate lookup to an OpenWeatherMap-compatible
//! endpoint and re-serializes the subset of the answer clients use.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::WeatherConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weather {
    pub weather: Vec<Condition>,
    pub main: Readings,
    #[serde(default)]
    pub visibility: i64,
    pub wind: Wind,
    pub clouds: Clouds,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Readings {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub pressure: i64,
    pub humidity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clouds {
    pub all: i64,
}

/// What to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates { lat: String, lon: String },
}

impl Location {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::City(city) => vec![("q", city.clone())],
            Location::Coordinates { lat, lon } => vec![("lat", lat.clone()), ("lon", lon.clone())],
        }
    }
}

/// Reusable client for the configured provider.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn lookup(&self, location: &Location) -> Result<Weather> {
        let mut params = location.query_pairs();
        params.push(("appid", self.api_key.clone()));

        let response = self.http.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("weather provider error {}: {}", status, body_text);
        }
        Ok(response.json().await?)
    }
}
