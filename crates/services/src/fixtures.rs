// Built-in match dataset used when no match backend is configured

use chrono::{DateTime, Utc};
use statsapp_models::MatchRecord;

const SEASON: &str = "2023/24";

// (id, kickoff, home, away, half time, full time, league)
type FixtureRow = (i64, &'static str, &'static str, &'static str, (u32, u32), (u32, u32), &'static str);

const OFFLINE_FIXTURES: [FixtureRow; 10] = [
    (1, "2024-01-15T15:00:00Z", "Barcelona", "Real Madrid", (1, 0), (2, 1), "spain"),
    (2, "2024-01-14T18:30:00Z", "Valencia", "Sevilla", (0, 1), (1, 1), "spain"),
    (3, "2024-01-13T20:00:00Z", "Athletic Bilbao", "Villarreal", (2, 0), (3, 1), "spain"),
    (4, "2024-01-12T16:15:00Z", "Las Palmas", "Getafe", (0, 0), (0, 2), "spain"),
    (5, "2024-01-11T19:45:00Z", "Girona", "Alaves", (1, 1), (2, 2), "spain"),
    (6, "2024-02-02T20:00:00Z", "Manchester City", "Liverpool", (1, 1), (2, 2), "england"),
    (7, "2024-02-05T18:00:00Z", "Arsenal", "Chelsea", (0, 0), (1, 0), "england"),
    (8, "2024-02-07T19:30:00Z", "Bayern Munich", "Borussia Dortmund", (2, 1), (3, 2), "germany"),
    (9, "2024-02-09T20:45:00Z", "Juventus", "Inter", (0, 0), (0, 1), "italy"),
    (10, "2024-02-12T21:00:00Z", "PSG", "Marseille", (1, 0), (2, 0), "france"),
];

/// The ten fixture matches, in declaration order.
pub fn offline_matches() -> Vec<MatchRecord> {
    OFFLINE_FIXTURES
        .iter()
        .filter_map(|&(id, kickoff, home, away, half_time, full_time, league)| {
            let match_time = DateTime::parse_from_rfc3339(kickoff)
                .ok()?
                .with_timezone(&Utc);
            Some(
                MatchRecord::new(id, home, away, match_time)
                    .with_half_time(half_time.0, half_time.1)
                    .with_full_time(full_time.0, full_time.1)
                    .with_league(league, SEASON),
            )
        })
        .collect()
}
