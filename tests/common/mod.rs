// Shared fixtures for the integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use statsapp_models::{MatchRecord, PredictionRequest};

pub fn kickoff(days_ago: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 19, 0, 0).unwrap() - Duration::days(days_ago)
}

pub fn match_record(id: i64, home: &str, away: &str, score: (u32, u32), days_ago: i64) -> MatchRecord {
    MatchRecord::new(id, home, away, kickoff(days_ago)).with_full_time(score.0, score.1)
}

/// Ten meetings, all won 3-0 by `home`.
pub fn dominant_home_record(home: &str, away: &str) -> Vec<MatchRecord> {
    (0..10)
        .map(|i| match_record(i, home, away, (3, 0), i * 7))
        .collect()
}

pub fn barcelona_getafe() -> PredictionRequest {
    PredictionRequest::new("Barcelona", "Getafe")
}

prop_compose! {
    pub fn arb_match(home: &'static str, away: &'static str)(
        id in 0i64..100_000,
        home_goals in 0u32..8,
        away_goals in 0u32..8,
        days_ago in 0i64..3650,
    ) -> MatchRecord {
        match_record(id, home, away, (home_goals, away_goals), days_ago)
    }
}

pub fn arb_history(max_len: usize) -> impl Strategy<Value = Vec<MatchRecord>> {
    prop::collection::vec(arb_match("Home FC", "Away FC"), 0..max_len)
}
