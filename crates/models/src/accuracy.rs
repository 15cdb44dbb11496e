//! Track record of past predictions against settled results, as reported by
//! the hosted prediction service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::error::{Result, StatsError};

/// One reliability bin: how often outcomes predicted at about
/// `predicted_probability` actually happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibrationBucket {
    pub predicted_probability: f64,
    pub actual_frequency: f64,
    pub count: u64,
}

impl CalibrationBucket {
    pub fn gap(&self) -> f64 {
        (self.predicted_probability - self.actual_frequency).abs()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyStats {
    pub total_predictions: u64,
    pub correct_predictions: u64,
    pub accuracy_percentage: f64,
    pub average_confidence: f64,
    pub brier_score: f64,
    #[serde(default)]
    pub calibration_data: Vec<CalibrationBucket>,
}

impl AccuracyStats {
    /// Count-weighted mean gap between predicted and observed frequency.
    /// `None` when no bucket holds any prediction.
    pub fn expected_calibration_error(&self) -> Option<f64> {
        let total: u64 = self.calibration_data.iter().map(|bucket| bucket.count).sum();
        if total == 0 {
            return None;
        }

        let weighted: f64 = self
            .calibration_data
            .iter()
            .map(|bucket| bucket.gap() * bucket.count as f64)
            .sum();
        Some(weighted / total as f64)
    }
}

/// Inclusive range of match dates an accuracy report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(StatsError::InvalidDateRange { from, to });
        }
        Ok(Self { from, to })
    }
}
