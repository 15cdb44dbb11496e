use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::{Result, StatsError};
use crate::match_record::MatchRecord;

pub const BASELINE_MODEL_VERSION: &str = "baseline-v1.0";
pub const DEFAULT_LEAGUE: &str = "Premier League";

/// Tolerance for the three outcome probabilities summing to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// Computed in-process by the baseline engine.
    Local,
    /// Precomputed by the hosted prediction service.
    Edge,
}

/// Outcome and market probabilities for one home/away pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaselinePrediction {
    pub home_win_probability: f64,
    pub draw_probability: f64,
    pub away_win_probability: f64,
    pub btts_probability: f64,
    pub over25_probability: f64,
    pub confidence_score: f64,
    pub key_factors: Vec<String>,
    pub model_version: String,
    pub prediction_source: PredictionSource,
}

impl BaselinePrediction {
    /// Checks every probability is finite and in `[0, 1]` and that the three
    /// outcomes sum to one.
    pub fn validate(&self) -> Result<()> {
        for prob in [
            self.home_win_probability,
            self.draw_probability,
            self.away_win_probability,
            self.btts_probability,
            self.over25_probability,
            self.confidence_score,
        ] {
            if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
                return Err(StatsError::InvalidProbability { prob });
            }
        }

        let total = self.outcome_total();
        if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(StatsError::InvalidProbability { prob: total });
        }

        Ok(())
    }

    pub fn outcome_total(&self) -> f64 {
        self.home_win_probability + self.draw_probability + self.away_win_probability
    }

    pub fn most_likely_outcome(&self) -> PredictedOutcome {
        let home_prob = self.home_win_probability;
        let away_prob = self.away_win_probability;
        let draw_prob = self.draw_probability;

        if home_prob >= away_prob && home_prob >= draw_prob {
            PredictedOutcome::HomeWin
        } else if away_prob >= draw_prob {
            PredictedOutcome::AwayWin
        } else {
            PredictedOutcome::Draw
        }
    }

    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence_score >= threshold
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PredictedOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

/// A prediction served by the hosted service, valid until `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgePrediction {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    #[serde(flatten)]
    pub prediction: BaselinePrediction,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl EdgePrediction {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Time left before expiry, `None` once expired.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        (self.expires_at - now).to_std().ok().filter(|ttl| !ttl.is_zero())
    }
}

/// Identifies which pairing a caller wants a prediction for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionParams {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: Option<String>,
}

impl PredictionParams {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            league: None,
        }
    }

    pub fn with_league(mut self, league: impl Into<String>) -> Self {
        self.league = Some(league.into());
        self
    }

    pub fn league_or_default(&self) -> &str {
        self.league.as_deref().unwrap_or(DEFAULT_LEAGUE)
    }
}

/// The three match collections a prediction is computed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchHistory {
    pub head_to_head: Vec<MatchRecord>,
    pub home_matches: Vec<MatchRecord>,
    pub away_matches: Vec<MatchRecord>,
}

impl MatchHistory {
    pub fn is_empty(&self) -> bool {
        self.head_to_head.is_empty() && self.home_matches.is_empty() && self.away_matches.is_empty()
    }
}

/// Payload of a `CALCULATE_PREDICTIONS` message. Missing team names decode as
/// empty strings so they surface as a validation error instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub home_matches: Vec<MatchRecord>,
    #[serde(default)]
    pub away_matches: Vec<MatchRecord>,
}

impl PredictionRequest {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            ..Self::default()
        }
    }

    pub fn from_parts(params: &PredictionParams, history: MatchHistory) -> Self {
        Self {
            home_team: params.home_team.clone(),
            away_team: params.away_team.clone(),
            matches: history.head_to_head,
            home_matches: history.home_matches,
            away_matches: history.away_matches,
        }
    }

    pub fn with_head_to_head(mut self, matches: Vec<MatchRecord>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_home_matches(mut self, matches: Vec<MatchRecord>) -> Self {
        self.home_matches = matches;
        self
    }

    pub fn with_away_matches(mut self, matches: Vec<MatchRecord>) -> Self {
        self.away_matches = matches;
        self
    }

    pub fn validate_teams(&self) -> Result<()> {
        validate_team_names(&self.home_team, &self.away_team)
    }
}

/// Both names must have something besides whitespace.
pub fn validate_team_names(home_team: &str, away_team: &str) -> Result<()> {
    if home_team.trim().is_empty() {
        return Err(StatsError::MissingTeam { field: "home team" });
    }
    if away_team.trim().is_empty() {
        return Err(StatsError::MissingTeam { field: "away team" });
    }
    Ok(())
}
