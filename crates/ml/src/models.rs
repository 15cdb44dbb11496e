// Prediction models

use statsapp_models::{BaselinePrediction, PredictionRequest, Result};

/// A synchronous, side-effect free model. Implementations are shared across
/// the worker boundary, hence `Send + Sync`.
pub trait PredictionModel: Send + Sync {
    fn model_name(&self) -> &str;
    fn model_version(&self) -> &str;
    fn predict(&self, request: &PredictionRequest) -> Result<BaselinePrediction>;
}
