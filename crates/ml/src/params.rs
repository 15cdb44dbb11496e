// Tunable constants of the baseline model

use serde::{Deserialize, Serialize};
use statsapp_models::{Result, Side, StatsError};

/// Every constant the baseline engine uses. The defaults are calibration
/// choices; override them through configuration after backtesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Most recent matches considered for the form index.
    pub form_window: usize,
    /// Most recent matches considered for the expected goals rate.
    pub goals_window: usize,
    pub neutral_form: f64,
    pub neutral_goals: f64,
    pub home_advantage: f64,
    pub away_factor: f64,
    /// Highest goal count per side in the scoreline grid.
    pub grid_max_goals: u32,
    pub form_sensitivity: f64,
    pub outcome_floor: f64,
    pub outcome_ceiling: f64,
    pub over25_ceiling: f64,
    pub confidence: ConfidenceParams,
    pub factors: FactorThresholds,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            form_window: 5,
            goals_window: 10,
            neutral_form: 0.5,
            neutral_goals: 1.5,
            home_advantage: 1.1,
            away_factor: 0.9,
            grid_max_goals: 6,
            form_sensitivity: 0.2,
            outcome_floor: 0.05,
            outcome_ceiling: 0.9,
            over25_ceiling: 0.95,
            confidence: ConfidenceParams::default(),
            factors: FactorThresholds::default(),
        }
    }
}

/// Data-sufficiency scoring. Each bucket adds `per_match * count`, capped at
/// its own limit before summing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceParams {
    pub base: f64,
    pub head_to_head_per_match: f64,
    pub head_to_head_cap: f64,
    pub home_per_match: f64,
    pub home_cap: f64,
    pub away_per_match: f64,
    pub away_cap: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            base: 0.3,
            head_to_head_per_match: 0.03,
            head_to_head_cap: 0.3,
            home_per_match: 0.01,
            home_cap: 0.2,
            away_per_match: 0.01,
            away_cap: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorThresholds {
    pub strong_form: f64,
    pub poor_form: f64,
    pub high_scoring_goals: f64,
    pub likely_market: f64,
    pub strong_history_matches: usize,
}

impl Default for FactorThresholds {
    fn default() -> Self {
        Self {
            strong_form: 0.7,
            poor_form: 0.3,
            high_scoring_goals: 2.5,
            likely_market: 0.7,
            strong_history_matches: 10,
        }
    }
}

impl ModelParams {
    pub fn venue_multiplier(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_advantage,
            Side::Away => self.away_factor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("neutral_goals", self.neutral_goals),
            ("home_advantage", self.home_advantage),
            ("away_factor", self.away_factor),
            ("form_sensitivity", self.form_sensitivity),
            ("confidence.head_to_head_per_match", self.confidence.head_to_head_per_match),
            ("confidence.home_per_match", self.confidence.home_per_match),
            ("confidence.away_per_match", self.confidence.away_per_match),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, format!("{value} must be a non-negative number")));
            }
        }

        let unit = [
            ("neutral_form", self.neutral_form),
            ("outcome_floor", self.outcome_floor),
            ("outcome_ceiling", self.outcome_ceiling),
            ("over25_ceiling", self.over25_ceiling),
            ("confidence.base", self.confidence.base),
            ("confidence.head_to_head_cap", self.confidence.head_to_head_cap),
            ("confidence.home_cap", self.confidence.home_cap),
            ("confidence.away_cap", self.confidence.away_cap),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(name, format!("{value} is outside [0, 1]")));
            }
        }

        if self.outcome_floor > self.outcome_ceiling {
            return Err(invalid(
                "outcome_floor",
                format!("{} exceeds outcome_ceiling {}", self.outcome_floor, self.outcome_ceiling),
            ));
        }

        let confidence = &self.confidence;
        let max_confidence =
            confidence.base + confidence.head_to_head_cap + confidence.home_cap + confidence.away_cap;
        if max_confidence > 1.0 + 1e-9 {
            return Err(invalid(
                "confidence",
                format!("base plus caps reach {max_confidence}, above 1.0"),
            ));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> StatsError {
    StatsError::InvalidParameter { name, reason }
}
