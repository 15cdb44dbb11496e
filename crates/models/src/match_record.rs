use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which end of a fixture a team is evaluated from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    /// League points: 3 for a win, 1 for a draw, 0 for a loss.
    pub fn points(self) -> u32 {
        match self {
            MatchResult::Win => 3,
            MatchResult::Draw => 1,
            MatchResult::Loss => 0,
        }
    }
}

/// One completed fixture. Half-time goals exceeding full-time goals are
/// accepted as-is; nothing downstream rejects odd data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    pub full_time_home_goals: u32,
    pub full_time_away_goals: u32,
    #[serde(default)]
    pub half_time_home_goals: u32,
    #[serde(default)]
    pub half_time_away_goals: u32,
    pub match_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

impl MatchRecord {
    pub fn new(
        id: i64,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        match_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            home_team: home_team.into(),
            away_team: away_team.into(),
            full_time_home_goals: 0,
            full_time_away_goals: 0,
            half_time_home_goals: 0,
            half_time_away_goals: 0,
            match_time,
            league: None,
            season: None,
        }
    }

    pub fn with_full_time(mut self, home_goals: u32, away_goals: u32) -> Self {
        self.full_time_home_goals = home_goals;
        self.full_time_away_goals = away_goals;
        self
    }

    pub fn with_half_time(mut self, home_goals: u32, away_goals: u32) -> Self {
        self.half_time_home_goals = home_goals;
        self.half_time_away_goals = away_goals;
        self
    }

    pub fn with_league(mut self, league: impl Into<String>, season: impl Into<String>) -> Self {
        self.league = Some(league.into());
        self.season = Some(season.into());
        self
    }

    pub fn goals_for(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.full_time_home_goals,
            Side::Away => self.full_time_away_goals,
        }
    }

    pub fn goals_against(&self, side: Side) -> u32 {
        self.goals_for(side.opposite())
    }

    pub fn result_for(&self, side: Side) -> MatchResult {
        let (scored, conceded) = (self.goals_for(side), self.goals_against(side));
        if scored > conceded {
            MatchResult::Win
        } else if scored == conceded {
            MatchResult::Draw
        } else {
            MatchResult::Loss
        }
    }

    pub fn total_goals(&self) -> u64 {
        u64::from(self.full_time_home_goals) + u64::from(self.full_time_away_goals)
    }

    pub fn half_time_goals(&self) -> u64 {
        u64::from(self.half_time_home_goals) + u64::from(self.half_time_away_goals)
    }

    pub fn both_teams_scored(&self) -> bool {
        self.full_time_home_goals > 0 && self.full_time_away_goals > 0
    }

    /// The side `team` played on, compared case-insensitively.
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home_team.eq_ignore_ascii_case(team) {
            Some(Side::Home)
        } else if self.away_team.eq_ignore_ascii_case(team) {
            Some(Side::Away)
        } else {
            None
        }
    }
}

/// Listing row as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormattedMatch {
    pub id: i64,
    pub match_date: String,
    pub home_team: String,
    pub away_team: String,
    pub result: String,
    pub half_time_result: String,
    pub total_goals: u64,
    pub both_teams_scored: bool,
}

impl From<&MatchRecord> for FormattedMatch {
    fn from(record: &MatchRecord) -> Self {
        Self {
            id: record.id,
            match_date: record.match_time.format("%Y. %m. %d.").to_string(),
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
            result: format!("{}-{}", record.full_time_home_goals, record.full_time_away_goals),
            half_time_result: format!(
                "{}-{}",
                record.half_time_home_goals, record.half_time_away_goals
            ),
            total_goals: record.total_goals(),
            both_teams_scored: record.both_teams_scored(),
        }
    }
}
