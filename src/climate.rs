//! Live CO2 and temperature counters.
//!
//! Displayed values chase their targets with exponential smoothing on every
//! tick; targets are refreshed from two remote endpoints on a slower clock.

use crate::cart::leading_number;
use crate::errors::ClimateFetchError;
use crate::state::AppState;
use crate::ticker::Tick;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

pub const SMOOTHING_FACTOR: f64 = 0.05;
pub const DEFAULT_CO2_PPM: f64 = 421.38;
pub const DEFAULT_TEMPERATURE_ANOMALY: f64 = 1.24;
pub const DEFAULT_CO2_URL: &str = "https://global-warming.org/api/co2-api";
pub const DEFAULT_TEMPERATURE_URL: &str = "https://global-warming.org/api/temperature-api";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedCounter {
    pub current: f64,
    pub target: f64,
}

impl SmoothedCounter {
    pub fn new(value: f64) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Non-finite targets are ignored so the counter keeps its last good one.
    pub fn set_target(&mut self, target: f64) -> bool {
        if !target.is_finite() {
            return false;
        }
        self.target = target;
        true
    }
}

impl Tick for SmoothedCounter {
    fn tick(&mut self, _interval: Duration) {
        self.current += (self.target - self.current) * SMOOTHING_FACTOR;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateSample {
    pub co2: SmoothedCounter,
    pub temperature: SmoothedCounter,
}

impl Default for ClimateSample {
    fn default() -> Self {
        Self {
            co2: SmoothedCounter::new(DEFAULT_CO2_PPM),
            temperature: SmoothedCounter::new(DEFAULT_TEMPERATURE_ANOMALY),
        }
    }
}

impl ClimateSample {
    pub fn co2_display(&self) -> String {
        format!("{:.2} ppm", self.co2.current)
    }

    pub fn temperature_display(&self) -> String {
        format!("{:.2}°C", self.temperature.current)
    }
}

impl Tick for ClimateSample {
    fn tick(&mut self, interval: Duration) {
        self.co2.tick(interval);
        self.temperature.tick(interval);
    }
}

/// Reads a number the way the page did: JSON numbers count, and strings count
/// by their leading numeric prefix (`"424.1 ppm"` is 424.1).
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => leading_number(text.trim()),
        _ => None,
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ClimateFetchError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ClimateFetchError::NonFinite { field, value })
    }
}

pub fn parse_co2(body: &Value) -> Result<f64, ClimateFetchError> {
    let value = body
        .get("co2")
        .and_then(as_number)
        .ok_or(ClimateFetchError::MissingField("co2"))?;
    finite("co2", value)
}

/// Only the first (most recent) record of `result` is consumed.
pub fn parse_temperature(body: &Value) -> Result<f64, ClimateFetchError> {
    let value = body
        .get("result")
        .and_then(|records| records.get(0))
        .and_then(|record| record.get("median"))
        .and_then(as_number)
        .ok_or(ClimateFetchError::MissingField("median"))?;
    finite("median", value)
}

#[derive(Debug, Clone)]
pub struct ClimateFetcher {
    client: Client,
    co2_url: String,
    temperature_url: String,
}

impl ClimateFetcher {
    pub fn new(co2_url: impl Into<String>, temperature_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            co2_url: co2_url.into(),
            temperature_url: temperature_url.into(),
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, ClimateFetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(body)
    }

    pub async fn fetch_co2(&self) -> Result<f64, ClimateFetchError> {
        parse_co2(&self.fetch_json(&self.co2_url).await?)
    }

    pub async fn fetch_temperature(&self) -> Result<f64, ClimateFetchError> {
        parse_temperature(&self.fetch_json(&self.temperature_url).await?)
    }

    /// One fetch cycle. Each quantity succeeds or fails on its own; failures
    /// are logged and leave the previous target in place.
    pub async fn refresh(&self, state: &AppState) {
        let (co2, temperature) = tokio::join!(self.fetch_co2(), self.fetch_temperature());

        let mut data = state.data.lock().await;
        match co2 {
            Ok(value) => {
                data.climate.co2.set_target(value);
                info!("co2 target updated to {value}");
            }
            Err(err) => warn!("co2 fetch failed, keeping previous target: {err}"),
        }
        match temperature {
            Ok(value) => {
                data.climate.temperature.set_target(value);
                info!("temperature target updated to {value}");
            }
            Err(err) => warn!("temperature fetch failed, keeping previous target: {err}"),
        }
    }
}
