use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::recommend::responses::{
    DebugView, LegView, QueryEcho, RecommendResponseV2, ResponseMeta, RiskLevel, RiskView,
    RouteView, TransferView,
};
use railcast_scoring::config::AggregationPolicy;
use railcast_scoring::ranker::RankedRoute;

/// Risk classification over already-computed route fields.
///
/// A route without transfers has no connection to miss, so its transfer
/// wait is treated as unconstrained (pass `f64::INFINITY`).
pub fn risk_level(has_risky: bool, min_transfer_wait: f64, p_on_time: f64) -> RiskLevel {
    if has_risky && (min_transfer_wait < 20.0 || p_on_time < 0.7) {
        return RiskLevel::High;
    }
    if has_risky {
        return RiskLevel::Med;
    }
    RiskLevel::Low
}

/// Map ranked routes into the externally consumed response shape. Derives
/// nothing new: every field comes from scoring output or the query echo.
pub fn present(
    ranked: &[RankedRoute],
    query: &QueryEcho,
    agg: AggregationPolicy,
    risky_stations: &HashSet<String>,
    candidate_count: usize,
) -> RecommendResponseV2 {
    let routes: Vec<RouteView> = ranked
        .iter()
        .enumerate()
        .filter_map(|(i, r)| present_route(i, r, query, agg, risky_stations))
        .collect();

    RecommendResponseV2 {
        query: query.clone(),
        meta: ResponseMeta {
            candidate_count,
            returned: routes.len(),
        },
        routes,
    }
}

fn present_route(
    index: usize,
    ranked: &RankedRoute,
    query: &QueryEcho,
    agg: AggregationPolicy,
    risky_stations: &HashSet<String>,
) -> Option<RouteView> {
    let route = &ranked.route;
    let departure_time = route.departure_time()?;
    let arrival_time = route.arrival_time()?;

    let total_duration_min = mins(departure_time, arrival_time);
    let arrival_slack_min = mins(arrival_time, query.deadline).max(0.0);

    let transfer_summary: Vec<TransferView> = route
        .transfer_info
        .iter()
        .map(|t| TransferView {
            station: t.station.clone(),
            transfer_wait_min: t.wait_min,
            ok: t.wait_min >= query.min_transfer_min as f64,
        })
        .collect();
    let min_transfer_wait = route.min_transfer_wait().unwrap_or(f64::INFINITY);

    let mut risky = Vec::new();
    for leg in &route.legs {
        for code in [&leg.dep_code, &leg.arr_code] {
            if risky_stations.contains(code.as_str()) && !risky.contains(code) {
                risky.push(code.clone());
            }
        }
    }

    let level = risk_level(route.has_risky_station, min_transfer_wait, route.probability);

    let mut user_messages = Vec::with_capacity(3);
    user_messages.push(format!(
        "Arrives {} min before the {} deadline",
        arrival_slack_min as i64,
        query.deadline.format("%H:%M")
    ));
    match (route.transfers, transfer_summary.first()) {
        (0, _) => user_messages.push("Direct service, no transfers".to_owned()),
        (1, Some(t)) => user_messages.push(format!(
            "1 transfer at {} with {} min to connect",
            t.station, t.transfer_wait_min as i64
        )),
        (n, _) => user_messages.push(format!(
            "{n} transfers, tightest connection {} min",
            min_transfer_wait as i64
        )),
    }
    if route.has_risky_station {
        user_messages.push("Passes a delay-prone station; extra delay risk".to_owned());
    }

    let legs: Vec<LegView> = route
        .legs
        .iter()
        .map(|l| LegView {
            train_id: l.train_id,
            train_no: l.train_no.clone(),
            from_code: l.dep_code.clone(),
            to_code: l.arr_code.clone(),
            dep_time: l.dep_time,
            arr_time: l.arr_time,
            leg_duration_min: mins(l.dep_time, l.arr_time),
            leg_on_time_probability: l.probability,
            segment: l.explain.segment.clone(),
            segment_is_risky: l.explain.is_risky_segment,
        })
        .collect();

    Some(RouteView {
        route_id: format!("r_{index}"),
        rank: ranked.rank,
        transfers: route.transfers,
        departure_time,
        arrival_time,
        total_duration_min,
        arrival_slack_min,
        on_time_probability: route.probability,
        risk: RiskView {
            has_risky_station: route.has_risky_station,
            risky_stations: risky,
            risk_level: level,
        },
        transfer_summary,
        user_messages,
        legs,
        debug: DebugView {
            agg: agg.as_str().to_owned(),
            explain: route.legs.iter().map(|l| l.explain.clone()).collect(),
        },
    })
}

fn mins(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use railcast_scoring::leg::LegExplain;
    use railcast_scoring::route::{ScoredRoute, ScoredRouteLeg, TransferInfo};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    // ── risk_level decision table ────────────────────────────────────

    #[test]
    fn risky_with_tight_transfer_is_high() {
        assert_eq!(risk_level(true, 10.0, 0.9), RiskLevel::High);
    }

    #[test]
    fn risky_with_low_probability_is_high() {
        // Single 10-minute transfer, p = 0.65, risky station touched.
        assert_eq!(risk_level(true, 10.0, 0.65), RiskLevel::High);
        assert_eq!(risk_level(true, 40.0, 0.65), RiskLevel::High);
    }

    #[test]
    fn risky_with_comfortable_margins_is_med() {
        assert_eq!(risk_level(true, 25.0, 0.85), RiskLevel::Med);
    }

    #[test]
    fn no_transfer_wait_is_unconstrained() {
        // Direct route: only the probability branch can fire.
        assert_eq!(risk_level(true, f64::INFINITY, 0.9), RiskLevel::Med);
        assert_eq!(risk_level(true, f64::INFINITY, 0.65), RiskLevel::High);
    }

    #[test]
    fn not_risky_is_low_regardless() {
        assert_eq!(risk_level(false, 5.0, 0.1), RiskLevel::Low);
        assert_eq!(risk_level(false, f64::INFINITY, 0.99), RiskLevel::Low);
    }

    // ── present ──────────────────────────────────────────────────────

    fn explain(segment: &str, risky: bool) -> LegExplain {
        LegExplain {
            segment: segment.to_owned(),
            slack_min: 90.0,
            target_ts: at(10, 0),
            is_risky_segment: risky,
            degraded_reason: None,
        }
    }

    fn scored_leg(
        train_no: &str,
        dep: &str,
        arr: &str,
        d: (u32, u32),
        a: (u32, u32),
        p: f64,
        risky: bool,
    ) -> ScoredRouteLeg {
        ScoredRouteLeg {
            train_id: 42,
            train_no: train_no.to_owned(),
            dep_code: dep.to_owned(),
            arr_code: arr.to_owned(),
            dep_time: at(d.0, d.1),
            arr_time: at(a.0, a.1),
            probability: p,
            explain: explain(&format!("{dep}->{arr}"), risky),
        }
    }

    fn query() -> QueryEcho {
        QueryEcho {
            from: "Seoul".to_owned(),
            to: "Jeonju".to_owned(),
            now: at(8, 0),
            deadline: at(12, 0),
            max_transfers: 2,
            min_transfer_min: 15,
        }
    }

    fn risky_set() -> HashSet<String> {
        ["NAT013271", "NAT040257"]
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn one_transfer_route(p: f64, wait_min: f64, risky: bool) -> RankedRoute {
        RankedRoute {
            rank: 1,
            route: ScoredRoute {
                transfers: 1,
                probability: p,
                legs: vec![
                    scored_leg("KTX101", "NAT010000", "NAT013271", (9, 0), (10, 0), 0.9, risky),
                    scored_leg(
                        "KTX202",
                        "NAT013271",
                        "NAT040257",
                        (10, wait_min as u32),
                        (11, 0),
                        p,
                        risky,
                    ),
                ],
                transfer_info: vec![TransferInfo {
                    station: "Dongdaegu".to_owned(),
                    wait_min,
                }],
                has_risky_station: risky,
            },
        }
    }

    #[test]
    fn tight_risky_transfer_presents_high_risk() {
        // 10-minute wait, p = 0.65, risky stations on both legs.
        let ranked = vec![one_transfer_route(0.65, 10.0, true)];
        let resp = present(&ranked, &query(), AggregationPolicy::Min, &risky_set(), 1);

        assert_eq!(resp.meta.candidate_count, 1);
        assert_eq!(resp.meta.returned, 1);

        let route = &resp.routes[0];
        assert_eq!(route.risk.risk_level, RiskLevel::High);
        assert!(route.risk.has_risky_station);
        assert_eq!(
            route.risk.risky_stations,
            vec!["NAT013271".to_owned(), "NAT040257".to_owned()]
        );
        // 10 < 15 minimum: connection flagged not ok.
        assert!(!route.transfer_summary[0].ok);
    }

    #[test]
    fn route_fields_derived_from_scored_legs() {
        let ranked = vec![one_transfer_route(0.9, 30.0, false)];
        let resp = present(&ranked, &query(), AggregationPolicy::Min, &risky_set(), 1);
        let route = &resp.routes[0];

        assert_eq!(route.route_id, "r_0");
        assert_eq!(route.rank, 1);
        assert_eq!(route.departure_time, at(9, 0));
        assert_eq!(route.arrival_time, at(11, 0));
        assert_eq!(route.total_duration_min, 120.0);
        assert_eq!(route.arrival_slack_min, 60.0);
        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.legs[0].leg_duration_min, 60.0);
        assert!(route.transfer_summary[0].ok);
        assert_eq!(route.risk.risk_level, RiskLevel::Low);
    }

    #[test]
    fn explain_echoed_unchanged() {
        let ranked = vec![one_transfer_route(0.8, 30.0, true)];
        let resp = present(&ranked, &query(), AggregationPolicy::Min, &risky_set(), 1);
        let route = &resp.routes[0];

        assert_eq!(route.debug.agg, "min");
        assert_eq!(route.debug.explain.len(), 2);
        for (view, leg) in route.debug.explain.iter().zip(&ranked[0].route.legs) {
            assert_eq!(view.segment, leg.explain.segment);
            assert_eq!(view.slack_min, leg.explain.slack_min);
            assert_eq!(view.target_ts, leg.explain.target_ts);
            assert_eq!(view.is_risky_segment, leg.explain.is_risky_segment);
        }
    }

    #[test]
    fn user_messages_are_ordered_and_deterministic() {
        let ranked = vec![one_transfer_route(0.8, 30.0, true)];
        let resp = present(&ranked, &query(), AggregationPolicy::Min, &risky_set(), 1);
        let msgs = &resp.routes[0].user_messages;

        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0], "Arrives 60 min before the 12:00 deadline");
        assert_eq!(msgs[1], "1 transfer at Dongdaegu with 30 min to connect");
        assert_eq!(msgs[2], "Passes a delay-prone station; extra delay risk");
    }

    #[test]
    fn direct_route_message_and_unconstrained_risk() {
        let ranked = vec![RankedRoute {
            rank: 1,
            route: ScoredRoute {
                transfers: 0,
                probability: 0.95,
                legs: vec![scored_leg(
                    "KTX301",
                    "NAT010000",
                    "NAT013271",
                    (9, 0),
                    (10, 30),
                    0.95,
                    true,
                )],
                transfer_info: vec![],
                has_risky_station: true,
            },
        }];
        let resp = present(&ranked, &query(), AggregationPolicy::Min, &risky_set(), 1);
        let route = &resp.routes[0];

        assert_eq!(route.user_messages[1], "Direct service, no transfers");
        // No transfer wait to violate: only the probability rule applies.
        assert_eq!(route.risk.risk_level, RiskLevel::Med);
        assert!(route.transfer_summary.is_empty());
    }

    #[test]
    fn two_transfer_message_uses_tightest_wait() {
        let ranked = vec![RankedRoute {
            rank: 1,
            route: ScoredRoute {
                transfers: 2,
                probability: 0.9,
                legs: vec![
                    scored_leg("A1", "P", "Q", (9, 0), (9, 40), 0.95, false),
                    scored_leg("B2", "Q", "R", (10, 0), (10, 40), 0.95, false),
                    scored_leg("C3", "R", "S", (10, 52), (11, 30), 0.9, false),
                ],
                transfer_info: vec![
                    TransferInfo {
                        station: "Q Station".to_owned(),
                        wait_min: 20.0,
                    },
                    TransferInfo {
                        station: "R Station".to_owned(),
                        wait_min: 12.0,
                    },
                ],
                has_risky_station: false,
            },
        }];
        let resp = present(&ranked, &query(), AggregationPolicy::Min, &risky_set(), 1);
        let route = &resp.routes[0];

        assert_eq!(
            route.user_messages[1],
            "2 transfers, tightest connection 12 min"
        );
        assert_eq!(route.transfer_summary.len(), 2);
        assert!(route.transfer_summary[0].ok);
        assert!(!route.transfer_summary[1].ok);
    }

    #[test]
    fn arrival_after_deadline_clamps_slack_to_zero() {
        let mut ranked = one_transfer_route(0.2, 30.0, false);
        ranked.route.legs[1].arr_time = at(13, 0);
        let resp = present(&[ranked], &query(), AggregationPolicy::Min, &risky_set(), 1);
        assert_eq!(resp.routes[0].arrival_slack_min, 0.0);
    }
}
