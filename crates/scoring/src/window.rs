use chrono::{DateTime, Duration, Utc};

use railcast_db::history::models::DelayBucket;

/// Fixed-length delay history ending strictly before a target timestamp,
/// ascending by time.
///
/// Sparse history is padded with synthetic zero-delay entries at bucket
/// cadence, placed strictly before the earliest real observation: "no data"
/// means "assume on-time", by explicit policy.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    entries: Vec<(DateTime<Utc>, f64)>,
    padded_steps: usize,
}

impl HistoryWindow {
    /// Build a window of exactly `steps` entries from at most `steps` real
    /// buckets (ascending, all before `target_ts`).
    pub fn build(
        real: &[DelayBucket],
        target_ts: DateTime<Utc>,
        steps: usize,
        bucket_minutes: i64,
    ) -> Self {
        // Cap at the most recent `steps` rows; the repository already
        // limits, callers may not.
        let real = &real[real.len().saturating_sub(steps)..];
        let missing = steps - real.len();

        // Synthetic entries end one bucket width before the earliest real
        // row (or before the target when there is no history at all).
        let pad_anchor = real.first().map(|b| b.ts).unwrap_or(target_ts);

        let mut entries = Vec::with_capacity(steps);
        for i in (1..=missing as i64).rev() {
            entries.push((pad_anchor - Duration::minutes(bucket_minutes * i), 0.0));
        }
        entries.extend(real.iter().map(|b| (b.ts, b.mean_delay_min)));

        Self {
            entries,
            padded_steps: missing,
        }
    }

    pub fn entries(&self) -> &[(DateTime<Utc>, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of synthetic zero-delay entries in the window.
    pub fn padded_steps(&self) -> usize {
        self.padded_steps
    }
}
