use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::predictor::NormScaler;
use crate::window::HistoryWindow;

/// Features per step: `[delay_norm, is_tue_wed_thu, is_peak, hour_sin, hour_cos]`.
pub const NUM_FEATURES: usize = 5;

/// Forecaster input of shape (lookback_steps, NUM_FEATURES).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInput {
    pub rows: Vec<[f32; NUM_FEATURES]>,
}

impl ModelInput {
    pub fn steps(&self) -> usize {
        self.rows.len()
    }
}

/// Floor a timestamp to the bucket grid.
pub fn floor_to_bucket(ts: DateTime<Utc>, bucket_minutes: i64) -> DateTime<Utc> {
    let bucket_secs = bucket_minutes * 60;
    let floored = ts.timestamp() - ts.timestamp().rem_euclid(bucket_secs);
    DateTime::from_timestamp(floored, 0).unwrap_or(ts)
}

/// Calendar features for one timestamp:
/// `[is_tue_wed_thu, is_peak, hour_sin, hour_cos]`.
///
/// Peak covers 07:00–09:30 and 17:00–19:30 inclusive. The sin/cos pair
/// encodes a single daily period over minute-of-day, continuous across
/// midnight.
pub fn time_features(ts: DateTime<Utc>) -> [f32; 4] {
    let is_twt = matches!(ts.weekday(), Weekday::Tue | Weekday::Wed | Weekday::Thu);

    let minutes = (ts.hour() * 60 + ts.minute()) as i64;
    let is_peak = (420..=570).contains(&minutes) || (1020..=1170).contains(&minutes);

    let frac_day = minutes as f64 / (24.0 * 60.0);
    let angle = 2.0 * std::f64::consts::PI * frac_day;

    [
        if is_twt { 1.0 } else { 0.0 },
        if is_peak { 1.0 } else { 0.0 },
        angle.sin() as f32,
        angle.cos() as f32,
    ]
}

/// Assemble the forecaster input from a history window: normalized delay in
/// column 0, time features of each bucket timestamp in columns 1..5.
pub fn build_model_input(window: &HistoryWindow, scaler: &NormScaler) -> ModelInput {
    let rows = window
        .entries()
        .iter()
        .map(|(ts, delay)| {
            let tf = time_features(*ts);
            let delay_norm = scaler.normalize(*delay) as f32;
            [delay_norm, tf[0], tf[1], tf[2], tf[3]]
        })
        .collect();

    ModelInput { rows }
}
