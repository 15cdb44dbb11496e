//! The baseline model: form and scoring-rate estimates feeding an independent
//! Poisson scoreline grid.
//!
//! Home-side estimates use the head-to-head matches plus the home team's
//! history, both read from the home perspective; the away side mirrors that
//! with the away team's history. Sparse input degrades to the neutral
//! defaults in [`ModelParams`], it never fails. Only missing team names fail.

use statsapp_models::{
    validate_team_names, BaselinePrediction, MatchRecord, PredictionRequest, PredictionSource,
    Result, Side, StatsError, BASELINE_MODEL_VERSION,
};
use tracing::debug;
use crate::confidence::{confidence_score, key_factors, FactorInputs};
use crate::estimators::{btts_probability, expected_goals, form_index};
use crate::models::PredictionModel;
use crate::outcome::{apply_form_adjustment, OVER_25_LINE, ScoreGrid};
use crate::params::ModelParams;

pub const BASELINE_MODEL_NAME: &str = "PoissonBaseline";

#[derive(Debug, Clone)]
pub struct BaselineModel {
    name: String,
    version: String,
    params: ModelParams,
}

impl BaselineModel {
    pub fn new() -> Self {
        Self {
            name: BASELINE_MODEL_NAME.to_string(),
            version: BASELINE_MODEL_VERSION.to_string(),
            params: ModelParams::default(),
        }
    }

    pub fn with_params(params: ModelParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::new()
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn compute(&self, request: &PredictionRequest) -> Result<BaselinePrediction> {
        self.evaluate(
            &request.home_team,
            &request.away_team,
            &request.matches,
            &request.home_matches,
            &request.away_matches,
        )
    }

    pub fn evaluate(
        &self,
        home_team: &str,
        away_team: &str,
        matches: &[MatchRecord],
        home_matches: &[MatchRecord],
        away_matches: &[MatchRecord],
    ) -> Result<BaselinePrediction> {
        validate_team_names(home_team, away_team)?;

        let params = &self.params;
        let home_history = || matches.iter().chain(home_matches);
        let away_history = || matches.iter().chain(away_matches);

        let home_form = form_index(home_history(), Side::Home, params);
        let away_form = form_index(away_history(), Side::Away, params);
        let home_xg = expected_goals(home_history(), Side::Home, params);
        let away_xg = expected_goals(away_history(), Side::Away, params);

        let grid = ScoreGrid::new(home_xg, away_xg, params.grid_max_goals);
        let outcomes = apply_form_adjustment(grid.outcomes(), home_form, away_form, params);
        let btts = btts_probability(home_xg, away_xg);
        let over25 = grid
            .over_probability(OVER_25_LINE)
            .clamp(0.0, params.over25_ceiling);

        let confidence = confidence_score(
            matches.len(),
            home_matches.len(),
            away_matches.len(),
            &params.confidence,
        );
        let factors = key_factors(
            &FactorInputs {
                home_team,
                away_team,
                home_form,
                away_form,
                home_xg,
                away_xg,
                btts_probability: btts,
                over25_probability: over25,
                head_to_head_count: matches.len(),
            },
            &params.factors,
        );

        debug!(
            "{} vs {}: form {:.3}/{:.3}, xG {:.3}/{:.3}, grid mass {:.5}",
            home_team,
            away_team,
            home_form,
            away_form,
            home_xg,
            away_xg,
            grid.mass()
        );

        let prediction = BaselinePrediction {
            home_win_probability: outcomes.home_win,
            draw_probability: outcomes.draw,
            away_win_probability: outcomes.away_win,
            btts_probability: btts,
            over25_probability: over25,
            confidence_score: confidence,
            key_factors: factors,
            model_version: self.version.clone(),
            prediction_source: PredictionSource::Local,
        };

        prediction
            .validate()
            .map_err(|e| StatsError::PredictionFailed {
                reason: e.to_string(),
            })?;

        Ok(prediction)
    }
}

impl Default for BaselineModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionModel for BaselineModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn predict(&self, request: &PredictionRequest) -> Result<BaselinePrediction> {
        self.compute(request)
    }
}

/// Baseline prediction with the default parameters.
pub fn compute_baseline(
    home_team: &str,
    away_team: &str,
    matches: &[MatchRecord],
    home_matches: &[MatchRecord],
    away_matches: &[MatchRecord],
) -> Result<BaselinePrediction> {
    BaselineModel::new().evaluate(home_team, away_team, matches, home_matches, away_matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn home_win(days_ago: i64) -> MatchRecord {
        let kickoff = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap() - Duration::days(days_ago);
        MatchRecord::new(days_ago, "Barcelona", "Getafe", kickoff).with_full_time(3, 0)
    }

    #[test]
    fn test_model_identity() {
        let model = BaselineModel::new();
        assert_eq!(model.model_name(), "PoissonBaseline");
        assert_eq!(model.model_version(), "baseline-v1.0");
    }

    #[test]
    fn test_empty_history_uses_neutral_defaults() {
        let prediction = compute_baseline("Barcelona", "Getafe", &[], &[], &[]).unwrap();

        assert_eq!(prediction.confidence_score, 0.3);
        assert_eq!(prediction.prediction_source, PredictionSource::Local);
        assert!(prediction.home_win_probability > prediction.away_win_probability);
        assert!((prediction.outcome_total() - 1.0).abs() < 1e-9);
        assert!(prediction.key_factors.is_empty());

        let expected_btts = (1.0 - (-1.65f64).exp()) * (1.0 - (-1.35f64).exp());
        assert!((prediction.btts_probability - expected_btts).abs() < 1e-12);
    }

    #[test]
    fn test_dominant_home_record() {
        let matches: Vec<MatchRecord> = (0..10).map(home_win).collect();
        let prediction = compute_baseline("Barcelona", "Getafe", &matches, &[], &[]).unwrap();

        assert!(prediction.home_win_probability > prediction.draw_probability);
        assert!(prediction.home_win_probability > prediction.away_win_probability);
        assert_eq!(prediction.btts_probability, 0.0);
        assert!(prediction.key_factors.contains(&"Barcelona excellent form".to_string()));
        assert!(prediction.key_factors.contains(&"Getafe poor form".to_string()));
        assert!((prediction.confidence_score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_team_names_fail() {
        assert!(matches!(
            compute_baseline("", "Getafe", &[], &[], &[]),
            Err(StatsError::MissingTeam { field: "home team" })
        ));
        assert!(matches!(
            compute_baseline("Barcelona", "   ", &[], &[], &[]),
            Err(StatsError::MissingTeam { field: "away team" })
        ));
    }

    #[test]
    fn test_custom_params_are_validated() {
        let params = ModelParams {
            outcome_floor: 0.95,
            ..ModelParams::default()
        };
        assert!(BaselineModel::with_params(params).is_err());

        let params = ModelParams {
            form_sensitivity: 0.1,
            ..ModelParams::default()
        };
        let model = BaselineModel::with_params(params).unwrap();
        assert_eq!(model.params().form_sensitivity, 0.1);
    }

    #[test]
    fn test_compute_matches_evaluate() {
        let request = PredictionRequest::new("Barcelona", "Getafe")
            .with_head_to_head((0..3).map(home_win).collect());
        let model = BaselineModel::new();

        assert_eq!(
            model.compute(&request).unwrap(),
            model.evaluate("Barcelona", "Getafe", &request.matches, &[], &[]).unwrap()
        );
    }
}
