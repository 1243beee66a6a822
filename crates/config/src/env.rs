use railcast_common::error::{RailcastError, RailcastResult};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub model_base_url: String,
    pub artifacts_dir: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,

    // Scoring policy knobs; defaults mirror the trained model's window.
    pub lookback_steps: usize,
    pub bucket_minutes: i64,
    pub route_agg: String,
    pub risky_station_codes: Vec<String>,
    pub deadline_grace_min: i64,
    pub max_total_hours: i64,
    pub default_min_transfer_min: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    pub fn from_env() -> RailcastResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: get_var("DATABASE_URL")?,
            model_base_url: get_var_or("MODEL_BASE_URL", "http://127.0.0.1:9100"),
            artifacts_dir: get_var_or("ARTIFACTS_DIR", "./artifacts"),
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "8080")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            lookback_steps: parse_var("LOOKBACK_STEPS", "12")?,
            bucket_minutes: parse_var("BUCKET_MINUTES", "10")?,
            route_agg: get_var_or("ROUTE_AGG", "min"),
            risky_station_codes: get_var_or("RISKY_STATION_CODES", "NAT013271,NAT040257")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            deadline_grace_min: parse_var("DEADLINE_GRACE_MIN", "90")?,
            max_total_hours: parse_var("MAX_TOTAL_HOURS", "12")?,
            default_min_transfer_min: parse_var("DEFAULT_MIN_TRANSFER_MIN", "15")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var(key: &str) -> RailcastResult<String> {
    env::var(key).map_err(|_| RailcastError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(key: &str, default: &str) -> RailcastResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_var_or(key, default)
        .parse()
        .map_err(|e| RailcastError::Config(format!("invalid {key}: {e}")))
}
