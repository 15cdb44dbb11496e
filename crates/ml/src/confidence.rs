// Confidence scoring and human-readable key factors

use crate::params::{ConfidenceParams, FactorThresholds};

/// Scales with how much history backs the prediction. Every bucket is capped
/// on its own, so with the default caps the total never exceeds 1.0.
pub fn confidence_score(
    head_to_head_count: usize,
    home_count: usize,
    away_count: usize,
    params: &ConfidenceParams,
) -> f64 {
    let bucket = |count: usize, per_match: f64, cap: f64| (count as f64 * per_match).min(cap);

    params.base
        + bucket(head_to_head_count, params.head_to_head_per_match, params.head_to_head_cap)
        + bucket(home_count, params.home_per_match, params.home_cap)
        + bucket(away_count, params.away_per_match, params.away_cap)
}

/// Everything the factor rules look at.
#[derive(Debug, Clone, Copy)]
pub struct FactorInputs<'a> {
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub home_form: f64,
    pub away_form: f64,
    pub home_xg: f64,
    pub away_xg: f64,
    pub btts_probability: f64,
    pub over25_probability: f64,
    pub head_to_head_count: usize,
}

/// Evaluates the rules in a fixed order; each contributes at most one line.
pub fn key_factors(inputs: &FactorInputs<'_>, thresholds: &FactorThresholds) -> Vec<String> {
    let mut factors = Vec::new();

    let form_factor = |team: &str, form: f64| {
        if form > thresholds.strong_form {
            Some(format!("{team} excellent form"))
        } else if form < thresholds.poor_form {
            Some(format!("{team} poor form"))
        } else {
            None
        }
    };
    factors.extend(form_factor(inputs.home_team, inputs.home_form));
    factors.extend(form_factor(inputs.away_team, inputs.away_form));

    if inputs.home_xg > thresholds.high_scoring_goals {
        factors.push("High-scoring home team".to_string());
    }
    if inputs.away_xg > thresholds.high_scoring_goals {
        factors.push("High-scoring away team".to_string());
    }
    if inputs.btts_probability > thresholds.likely_market {
        factors.push("Both teams likely to score".to_string());
    }
    if inputs.over25_probability > thresholds.likely_market {
        factors.push("High-scoring match expected".to_string());
    }
    if inputs.head_to_head_count > thresholds.strong_history_matches {
        factors.push("Strong H2H history".to_string());
    }

    factors
}
