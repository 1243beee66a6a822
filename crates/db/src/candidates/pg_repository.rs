use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::candidates::models::{CandidateLeg, CandidateQuery, RouteCandidate};
use crate::candidates::repositories::CandidateRepository;
use railcast_common::error::{RailcastError, RailcastResult};

#[derive(Clone)]
pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_leg(row: &PgRow, prefix: &str) -> RailcastResult<CandidateLeg> {
        Ok(CandidateLeg {
            train_id: get(row, &format!("{prefix}_train_id"))?,
            train_no: get(row, &format!("{prefix}_train_no"))?,
            dep_code: get(row, &format!("{prefix}_dep_code"))?,
            arr_code: get(row, &format!("{prefix}_arr_code"))?,
            dep_time: get(row, &format!("{prefix}_dep_time"))?,
            arr_time: get(row, &format!("{prefix}_arr_time"))?,
        })
    }

    fn map_candidate(row: &PgRow, legs: usize) -> RailcastResult<RouteCandidate> {
        let prefixes = ["leg1", "leg2", "leg3"];
        let mapped = prefixes[..legs]
            .iter()
            .map(|p| Self::map_leg(row, p))
            .collect::<RailcastResult<Vec<_>>>()?;

        let mut transfer_stations = Vec::with_capacity(legs - 1);
        for i in 1..legs {
            transfer_stations.push(get(row, &format!("transfer{i}_station"))?);
        }

        Ok(RouteCandidate {
            legs: mapped,
            transfer_stations,
        })
    }

    /// Map all rows of one shape, skipping structurally broken rows.
    ///
    /// A row missing a mandatory leg field invalidates only that candidate;
    /// the rest of the batch still scores.
    fn collect_candidates(rows: &[PgRow], legs: usize) -> Vec<RouteCandidate> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match Self::map_candidate(row, legs) {
                Ok(candidate) => out.push(candidate),
                Err(e) => tracing::warn!(error = %e, "skipping malformed candidate row"),
            }
        }
        out
    }
}

fn get<'r, T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>>(
    row: &'r PgRow,
    column: &str,
) -> RailcastResult<T> {
    row.try_get(column)
        .map_err(|e| RailcastError::Database(format!("column {column}: {e}")))
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn find_direct(&self, query: &CandidateQuery) -> RailcastResult<Vec<RouteCandidate>> {
        let rows = sqlx::query(
            "select l.train_id as leg1_train_id, l.train_no as leg1_train_no,
                    l.dep_station_code as leg1_dep_code, l.arr_station_code as leg1_arr_code,
                    l.dep_time as leg1_dep_time, l.arr_time as leg1_arr_time
             from scheduled_legs l
             where l.dep_station_name = $1
               and l.arr_station_name = $2
               and l.dep_time > $3
               and l.arr_time <= $4
               and l.arr_time - l.dep_time <= make_interval(hours => $5)
             order by l.arr_time
             limit $6",
        )
        .bind(&query.from_name)
        .bind(&query.to_name)
        .bind(query.now)
        .bind(query.latest_arrival)
        .bind(query.max_total_hours as i32)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RailcastError::Database(e.to_string()))?;

        Ok(Self::collect_candidates(&rows, 1))
    }

    async fn find_one_transfer(
        &self,
        query: &CandidateQuery,
    ) -> RailcastResult<Vec<RouteCandidate>> {
        let rows = sqlx::query(
            "select a.train_id as leg1_train_id, a.train_no as leg1_train_no,
                    a.dep_station_code as leg1_dep_code, a.arr_station_code as leg1_arr_code,
                    a.dep_time as leg1_dep_time, a.arr_time as leg1_arr_time,
                    b.train_id as leg2_train_id, b.train_no as leg2_train_no,
                    b.dep_station_code as leg2_dep_code, b.arr_station_code as leg2_arr_code,
                    b.dep_time as leg2_dep_time, b.arr_time as leg2_arr_time,
                    a.arr_station_name as transfer1_station
             from scheduled_legs a
             join scheduled_legs b on b.dep_station_code = a.arr_station_code
             where a.dep_station_name = $1
               and b.arr_station_name = $2
               and a.dep_time > $3
               and b.arr_time <= $4
               and b.dep_time >= a.arr_time + make_interval(mins => $5)
               and b.arr_time - a.dep_time <= make_interval(hours => $6)
             order by b.arr_time
             limit $7",
        )
        .bind(&query.from_name)
        .bind(&query.to_name)
        .bind(query.now)
        .bind(query.latest_arrival)
        .bind(query.min_transfer_min as i32)
        .bind(query.max_total_hours as i32)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RailcastError::Database(e.to_string()))?;

        Ok(Self::collect_candidates(&rows, 2))
    }

    async fn find_two_transfer(
        &self,
        query: &CandidateQuery,
    ) -> RailcastResult<Vec<RouteCandidate>> {
        let rows = sqlx::query(
            "select a.train_id as leg1_train_id, a.train_no as leg1_train_no,
                    a.dep_station_code as leg1_dep_code, a.arr_station_code as leg1_arr_code,
                    a.dep_time as leg1_dep_time, a.arr_time as leg1_arr_time,
                    b.train_id as leg2_train_id, b.train_no as leg2_train_no,
                    b.dep_station_code as leg2_dep_code, b.arr_station_code as leg2_arr_code,
                    b.dep_time as leg2_dep_time, b.arr_time as leg2_arr_time,
                    c.train_id as leg3_train_id, c.train_no as leg3_train_no,
                    c.dep_station_code as leg3_dep_code, c.arr_station_code as leg3_arr_code,
                    c.dep_time as leg3_dep_time, c.arr_time as leg3_arr_time,
                    a.arr_station_name as transfer1_station,
                    b.arr_station_name as transfer2_station
             from scheduled_legs a
             join scheduled_legs b on b.dep_station_code = a.arr_station_code
             join scheduled_legs c on c.dep_station_code = b.arr_station_code
             where a.dep_station_name = $1
               and c.arr_station_name = $2
               and a.dep_time > $3
               and c.arr_time <= $4
               and b.dep_time >= a.arr_time + make_interval(mins => $5)
               and c.dep_time >= b.arr_time + make_interval(mins => $5)
               and c.arr_time - a.dep_time <= make_interval(hours => $6)
             order by c.arr_time
             limit $7",
        )
        .bind(&query.from_name)
        .bind(&query.to_name)
        .bind(query.now)
        .bind(query.latest_arrival)
        .bind(query.min_transfer_min as i32)
        .bind(query.max_total_hours as i32)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RailcastError::Database(e.to_string()))?;

        Ok(Self::collect_candidates(&rows, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::{DateTime, TimeZone, Utc};

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        Some(create_pool(&url).await.expect("db should connect"))
    }

    async fn ensure_table(pool: &PgPool) {
        sqlx::query(
            "create table if not exists scheduled_legs (
               train_id bigint not null,
               train_no text not null,
               dep_station_code text not null,
               dep_station_name text not null,
               arr_station_code text not null,
               arr_station_name text not null,
               dep_time timestamptz not null,
               arr_time timestamptz not null
             )",
        )
        .execute(pool)
        .await
        .expect("create scheduled_legs");
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_leg(
        pool: &PgPool,
        train_id: i64,
        train_no: &str,
        dep: (&str, &str),
        arr: (&str, &str),
        dep_time: DateTime<Utc>,
        arr_time: DateTime<Utc>,
    ) {
        sqlx::query(
            "insert into scheduled_legs
             (train_id, train_no, dep_station_code, dep_station_name,
              arr_station_code, arr_station_name, dep_time, arr_time)
             values ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(train_id)
        .bind(train_no)
        .bind(dep.0)
        .bind(dep.1)
        .bind(arr.0)
        .bind(arr.1)
        .bind(dep_time)
        .bind(arr_time)
        .execute(pool)
        .await
        .expect("insert leg");
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    fn query(from: &str, to: &str, min_transfer: i64) -> CandidateQuery {
        CandidateQuery {
            from_name: from.to_owned(),
            to_name: to.to_owned(),
            now: at(8, 0),
            latest_arrival: at(20, 0),
            min_transfer_min: min_transfer,
            max_total_hours: 12,
            limit: 50,
        }
    }

    #[tokio::test]
    async fn one_transfer_joins_on_transfer_station_and_min_wait() {
        let pool = match test_pool().await {
            Some(p) => p,
            None => return,
        };
        ensure_table(&pool).await;

        // Unique station names per test run so reruns don't collide.
        let run = std::process::id();
        let from = format!("From{run}");
        let hub = format!("Hub{run}");
        let to = format!("To{run}");
        let (from_c, hub_c, to_c) = (
            format!("F{run}"),
            format!("H{run}"),
            format!("T{run}"),
        );

        insert_leg(
            &pool,
            1,
            "KTX101",
            (&from_c, &from),
            (&hub_c, &hub),
            at(9, 0),
            at(10, 0),
        )
        .await;
        // Connects with 30 min wait.
        insert_leg(
            &pool,
            2,
            "KTX202",
            (&hub_c, &hub),
            (&to_c, &to),
            at(10, 30),
            at(11, 30),
        )
        .await;
        // Too tight: 5 min wait, filtered by min_transfer_min = 15.
        insert_leg(
            &pool,
            3,
            "KTX203",
            (&hub_c, &hub),
            (&to_c, &to),
            at(10, 5),
            at(11, 5),
        )
        .await;

        let repo = PgCandidateRepository::new(pool);
        let candidates = repo
            .find_one_transfer(&query(&from, &to, 15))
            .await
            .expect("query should succeed");

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.transfers(), 1);
        assert_eq!(c.legs[0].train_no, "KTX101");
        assert_eq!(c.legs[1].train_no, "KTX202");
        assert_eq!(c.transfer_stations, vec![hub]);
    }

    #[tokio::test]
    async fn direct_respects_deadline_bound() {
        let pool = match test_pool().await {
            Some(p) => p,
            None => return,
        };
        ensure_table(&pool).await;

        let run = std::process::id();
        let from = format!("DFrom{run}");
        let to = format!("DTo{run}");

        insert_leg(
            &pool,
            10,
            "ITX301",
            ("DF1", &from),
            ("DT1", &to),
            at(9, 0),
            at(10, 0),
        )
        .await;
        // Arrives after latest_arrival; must be excluded.
        insert_leg(
            &pool,
            11,
            "ITX302",
            ("DF1", &from),
            ("DT1", &to),
            at(19, 30),
            at(21, 0),
        )
        .await;

        let repo = PgCandidateRepository::new(pool);
        let candidates = repo
            .find_direct(&query(&from, &to, 15))
            .await
            .expect("query should succeed");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].legs[0].train_no, "ITX301");
        assert!(candidates[0].transfer_stations.is_empty());
    }
}
