use crate::climate::{DEFAULT_CO2_URL, DEFAULT_TEMPERATURE_URL};
use crate::storage::resolve_data_path;
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 3 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub co2_url: String,
    pub temperature_url: String,
    pub tick_interval: Duration,
    pub fetch_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let data_path = resolve_data_path()?;
        Ok(Self::from_lookup(data_path, |key| env::var(key).ok()))
    }

    pub fn from_lookup(data_path: PathBuf, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tick_ms = parse_or(&lookup, "ECOGUARD_TICK_MS", DEFAULT_TICK_MS).max(1);
        let fetch_secs =
            parse_or(&lookup, "ECOGUARD_FETCH_INTERVAL_SECS", DEFAULT_FETCH_INTERVAL_SECS).max(1);

        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            data_path,
            co2_url: lookup("ECOGUARD_CO2_URL").unwrap_or_else(|| DEFAULT_CO2_URL.to_string()),
            temperature_url: lookup("ECOGUARD_TEMPERATURE_URL")
                .unwrap_or_else(|| DEFAULT_TEMPERATURE_URL.to_string()),
            tick_interval: Duration::from_millis(tick_ms),
            fetch_interval: Duration::from_secs(fetch_secs),
        }
    }
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }),
        None => default,
    }
}
