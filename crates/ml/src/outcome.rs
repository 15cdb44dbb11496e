//! Scoreline distribution and the 1X2 / over-under markets derived from it.
//!
//! The grid is truncated at `grid_max_goals` per side. Mass beyond the bound
//! is dropped rather than redistributed, so the raw 1X2 buckets sum to a
//! little under one until [`apply_form_adjustment`] normalizes them.

use serde::{Deserialize, Serialize};
use crate::params::ModelParams;
use crate::poisson;

pub const OVER_25_LINE: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }

    /// Rescales so the three outcomes sum to one.
    pub fn normalized(self) -> Self {
        let total = self.total();
        Self {
            home_win: self.home_win / total,
            draw: self.draw / total,
            away_win: self.away_win / total,
        }
    }
}

/// Independent Poisson joint distribution over `(home goals, away goals)`.
#[derive(Debug, Clone)]
pub struct ScoreGrid {
    max_goals: u32,
    cells: Vec<f64>,
}

impl ScoreGrid {
    pub fn new(home_xg: f64, away_xg: f64, max_goals: u32) -> Self {
        let home: Vec<f64> = (0..=max_goals).map(|k| poisson::probability(home_xg, k)).collect();
        let away: Vec<f64> = (0..=max_goals).map(|k| poisson::probability(away_xg, k)).collect();

        let mut cells = Vec::with_capacity(home.len() * away.len());
        for home_prob in &home {
            for away_prob in &away {
                cells.push(home_prob * away_prob);
            }
        }

        Self { max_goals, cells }
    }

    pub fn max_goals(&self) -> u32 {
        self.max_goals
    }

    fn width(&self) -> usize {
        self.max_goals as usize + 1
    }

    pub fn get(&self, home_goals: u32, away_goals: u32) -> Option<f64> {
        if home_goals > self.max_goals || away_goals > self.max_goals {
            return None;
        }
        self.cells
            .get(home_goals as usize * self.width() + away_goals as usize)
            .copied()
    }

    /// `(home goals, away goals, probability)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        let width = self.width();
        self.cells.iter().enumerate().map(move |(index, &prob)| {
            #[allow(clippy::cast_possible_truncation)]
            let (home, away) = ((index / width) as u32, (index % width) as u32);
            (home, away, prob)
        })
    }

    /// Probability mass captured by the truncated grid.
    pub fn mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    pub fn outcomes(&self) -> OutcomeProbabilities {
        let mut outcomes = OutcomeProbabilities {
            home_win: 0.0,
            draw: 0.0,
            away_win: 0.0,
        };
        for (home, away, prob) in self.iter() {
            match home.cmp(&away) {
                std::cmp::Ordering::Greater => outcomes.home_win += prob,
                std::cmp::Ordering::Equal => outcomes.draw += prob,
                std::cmp::Ordering::Less => outcomes.away_win += prob,
            }
        }
        outcomes
    }

    /// Mass of the cells whose total goals exceed `line`.
    pub fn over_probability(&self, line: f64) -> f64 {
        self.iter()
            .filter(|&(home, away, _)| f64::from(home + away) > line)
            .map(|(_, _, prob)| prob)
            .sum()
    }

    /// The single likeliest scoreline.
    pub fn most_likely_score(&self) -> (u32, u32, f64) {
        self.iter()
            .fold((0, 0, f64::MIN), |best, cell| if cell.2 > best.2 { cell } else { best })
    }
}

/// Raw, un-normalized 1X2 probabilities over the truncated grid.
pub fn outcome_probabilities(home_xg: f64, away_xg: f64, params: &ModelParams) -> OutcomeProbabilities {
    ScoreGrid::new(home_xg, away_xg, params.grid_max_goals).outcomes()
}

/// Over 2.5 goals over the truncated grid, capped at `over25_ceiling`.
pub fn over25_probability(home_xg: f64, away_xg: f64, params: &ModelParams) -> f64 {
    ScoreGrid::new(home_xg, away_xg, params.grid_max_goals)
        .over_probability(OVER_25_LINE)
        .clamp(0.0, params.over25_ceiling)
}

/// Shifts probability towards the in-form side, clamps both win outcomes,
/// recomputes the draw and normalizes so the three sum to one.
pub fn apply_form_adjustment(
    raw: OutcomeProbabilities,
    home_form: f64,
    away_form: f64,
    params: &ModelParams,
) -> OutcomeProbabilities {
    let adjustment = (home_form - away_form) * params.form_sensitivity;
    let (floor, ceiling) = (params.outcome_floor, params.outcome_ceiling);

    let home_win = (raw.home_win + adjustment).clamp(floor, ceiling);
    let away_win = (raw.away_win - adjustment).clamp(floor, ceiling);
    let draw = (1.0 - home_win - away_win).max(floor);

    OutcomeProbabilities {
        home_win,
        draw,
        away_win,
    }
    .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_and_lookup() {
        let grid = ScoreGrid::new(1.5, 1.2, 6);
        assert_eq!(grid.iter().count(), 49);
        assert!(grid.get(6, 6).is_some());
        assert_eq!(grid.get(7, 0), None);

        let expected = poisson::probability(1.5, 2) * poisson::probability(1.2, 1);
        assert!((grid.get(2, 1).unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn test_truncated_mass_is_below_one() {
        let grid = ScoreGrid::new(1.65, 1.35, 6);
        let mass = grid.mass();
        assert!(mass < 1.0);
        assert!(mass > 0.99);
        assert!((grid.outcomes().total() - mass).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_rates_give_symmetric_outcomes() {
        let outcomes = outcome_probabilities(1.4, 1.4, &ModelParams::default());
        assert!((outcomes.home_win - outcomes.away_win).abs() < 1e-12);
        assert!(outcomes.draw > 0.0);
    }

    #[test]
    fn test_over25_ceiling() {
        let params = ModelParams::default();
        assert!(over25_probability(6.0, 6.0, &params) <= 0.95);
        assert_eq!(over25_probability(0.0, 0.0, &params), 0.0);

        let capped = ModelParams {
            over25_ceiling: 0.5,
            ..ModelParams::default()
        };
        assert_eq!(over25_probability(3.0, 3.0, &capped), 0.5);

        let moderate = over25_probability(1.0, 1.0, &params);
        // P(total >= 3) for total ~ Poisson(2), less the truncated tail.
        let exact = 1.0 - (-2.0f64).exp() * (1.0 + 2.0 + 2.0);
        assert!(moderate <= exact);
        assert!(exact - moderate < 1e-3);
    }

    #[test]
    fn test_form_adjustment_normalizes() {
        let params = ModelParams::default();
        let raw = outcome_probabilities(1.65, 1.35, &params);
        let adjusted = apply_form_adjustment(raw, 0.5, 0.5, &params);

        assert!((adjusted.total() - 1.0).abs() < 1e-12);
        assert!(adjusted.home_win > adjusted.away_win);
    }

    #[test]
    fn test_form_adjustment_clamps() {
        let params = ModelParams::default();
        let raw = OutcomeProbabilities {
            home_win: 0.85,
            draw: 0.1,
            away_win: 0.04,
        };
        let adjusted = apply_form_adjustment(raw, 1.0, 0.0, &params);

        // home 0.9, away 0.05, draw floored at 0.05
        assert!((adjusted.home_win - 0.9).abs() < 1e-12);
        assert!((adjusted.away_win - 0.05).abs() < 1e-12);
        assert!((adjusted.draw - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_most_likely_score() {
        let (home, away, prob) = ScoreGrid::new(0.2, 0.1, 6).most_likely_score();
        assert_eq!((home, away), (0, 0));
        assert!(prob > 0.7);
    }
}
