//! Rate estimators over a team's match history.
//!
//! None of these filter by team name: the caller hands in matches already
//! relevant to the team and picks the side it is evaluated from.

use statsapp_models::{MatchRecord, Side};
use crate::params::ModelParams;
use crate::poisson;

/// Up to `limit` matches, most recent kickoff first. Ties keep input order.
pub fn most_recent<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    limit: usize,
) -> Vec<&'a MatchRecord> {
    let mut recent: Vec<&MatchRecord> = matches.into_iter().collect();
    recent.sort_by(|a, b| b.match_time.cmp(&a.match_time));
    recent.truncate(limit);
    recent
}

/// Points share over the last `form_window` matches, in `[0, 1]`.
/// Neutral when there is nothing to look at.
pub fn form_index<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    side: Side,
    params: &ModelParams,
) -> f64 {
    let recent = most_recent(matches, params.form_window);
    if recent.is_empty() {
        return params.neutral_form;
    }

    let points: u32 = recent.iter().map(|m| m.result_for(side).points()).sum();
    f64::from(points) / (3.0 * recent.len() as f64)
}

/// Mean goals scored over the last `goals_window` matches, scaled by the
/// venue multiplier for `side`.
pub fn expected_goals<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    side: Side,
    params: &ModelParams,
) -> f64 {
    let recent = most_recent(matches, params.goals_window);
    let mean = if recent.is_empty() {
        params.neutral_goals
    } else {
        let goals: u64 = recent.iter().map(|m| u64::from(m.goals_for(side))).sum();
        goals as f64 / recent.len() as f64
    };

    mean * params.venue_multiplier(side)
}

/// Both teams to score, from the Poisson zero-goal probabilities of each side.
pub fn btts_probability(home_xg: f64, away_xg: f64) -> f64 {
    let home_blank = poisson::probability(home_xg, 0);
    let away_blank = poisson::probability(away_xg, 0);
    // 1 - P(h=0) - P(a=0) + P(h=0)P(a=0), factored
    ((1.0 - home_blank) * (1.0 - away_blank)).clamp(0.0, 1.0)
}
