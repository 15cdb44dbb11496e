use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid input: {field} is required")]
    MissingTeam { field: &'static str },

    #[error("Invalid probability: {prob}, must be between 0.0 and 1.0")]
    InvalidProbability { prob: f64 },

    #[error("Invalid model parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: chrono::NaiveDate, to: chrono::NaiveDate },

    #[error("Model prediction failed: {reason}")]
    PredictionFailed { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
