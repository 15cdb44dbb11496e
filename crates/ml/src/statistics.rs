// Descriptive statistics over a set of matches

use serde::{Deserialize, Serialize};
use statsapp_models::{MatchRecord, MatchResult, Side};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageGoals {
    pub average_home_goals: f64,
    pub average_away_goals: f64,
    pub average_total_goals: f64,
    pub average_half_time_goals: f64,
}

/// Percentages are on a 0-100 scale. An empty set yields all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub total_matches: usize,
    pub average_goals: AverageGoals,
    pub both_teams_scored_percentage: f64,
    pub over25_percentage: f64,
    pub home_win_percentage: f64,
    pub draw_percentage: f64,
    pub away_win_percentage: f64,
}

impl MatchStatistics {
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a MatchRecord>) -> Self {
        let mut total = 0usize;
        let (mut home_goals, mut away_goals, mut half_time_goals) = (0u64, 0u64, 0u64);
        let (mut btts, mut over25) = (0usize, 0usize);
        let (mut home_wins, mut draws, mut away_wins) = (0usize, 0usize, 0usize);

        for record in matches {
            total += 1;
            home_goals += u64::from(record.full_time_home_goals);
            away_goals += u64::from(record.full_time_away_goals);
            half_time_goals += record.half_time_goals();
            if record.both_teams_scored() {
                btts += 1;
            }
            if record.total_goals() > 2 {
                over25 += 1;
            }
            match record.result_for(Side::Home) {
                MatchResult::Win => home_wins += 1,
                MatchResult::Draw => draws += 1,
                MatchResult::Loss => away_wins += 1,
            }
        }

        if total == 0 {
            return Self::default();
        }

        let n = total as f64;
        let percentage = |count: usize| count as f64 * 100.0 / n;

        Self {
            total_matches: total,
            average_goals: AverageGoals {
                average_home_goals: home_goals as f64 / n,
                average_away_goals: away_goals as f64 / n,
                average_total_goals: (home_goals + away_goals) as f64 / n,
                average_half_time_goals: half_time_goals as f64 / n,
            },
            both_teams_scored_percentage: percentage(btts),
            over25_percentage: percentage(over25),
            home_win_percentage: percentage(home_wins),
            draw_percentage: percentage(draws),
            away_win_percentage: percentage(away_wins),
        }
    }
}

/// A team's record across matches it took part in, whichever side it played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u64,
    pub goals_against: u64,
}

impl TeamRecord {
    /// Matches not involving `team` are skipped.
    pub fn from_matches<'a>(team: &str, matches: impl IntoIterator<Item = &'a MatchRecord>) -> Self {
        let mut record = Self {
            team: team.to_string(),
            ..Self::default()
        };

        for m in matches {
            let Some(side) = m.side_of(team) else {
                continue;
            };
            record.played += 1;
            record.goals_for += u64::from(m.goals_for(side));
            record.goals_against += u64::from(m.goals_against(side));
            match m.result_for(side) {
                MatchResult::Win => record.wins += 1,
                MatchResult::Draw => record.draws += 1,
                MatchResult::Loss => record.losses += 1,
            }
        }

        record
    }

    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    pub fn goal_difference(&self) -> i64 {
        #[allow(clippy::cast_possible_wrap)]
        let (scored, conceded) = (self.goals_for as i64, self.goals_against as i64);
        scored - conceded
    }
}
