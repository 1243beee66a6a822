use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::history::models::DelayBucket;
use crate::history::repositories::DelayHistoryRepository;
use railcast_common::error::{RailcastError, RailcastResult};

#[derive(Clone)]
pub struct PgDelayHistoryRepository {
    pool: PgPool,
}

impl PgDelayHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_bucket_row(row: &PgRow) -> RailcastResult<DelayBucket> {
        Ok(DelayBucket {
            segment: try_get(row, "segment")?,
            ts: try_get(row, "ts")?,
            mean_delay_min: try_get(row, "mean_delay_min")?,
        })
    }
}

fn try_get<'r, T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>>(
    row: &'r PgRow,
    column: &str,
) -> RailcastResult<T> {
    row.try_get(column)
        .map_err(|e| RailcastError::Database(format!("column {column}: {e}")))
}

#[async_trait]
impl DelayHistoryRepository for PgDelayHistoryRepository {
    async fn fetch_lookback(
        &self,
        segment: &str,
        target_ts: DateTime<Utc>,
        steps: i64,
    ) -> RailcastResult<Vec<DelayBucket>> {
        // Newest-first window strictly before the target bucket, then
        // reversed so callers always see ascending time.
        let rows = sqlx::query(
            "select segment, ts, mean_delay_min
             from segment_delay_buckets
             where segment = $1
               and ts < $2
             order by ts desc
             limit $3",
        )
        .bind(segment)
        .bind(target_ts)
        .bind(steps)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RailcastError::Database(e.to_string()))?;

        let mut buckets = rows
            .iter()
            .map(Self::map_bucket_row)
            .collect::<RailcastResult<Vec<_>>>()?;
        buckets.reverse();
        Ok(buckets)
    }
}
