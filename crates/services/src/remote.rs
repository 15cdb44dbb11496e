// Hosted prediction service contract

use anyhow::Result;
use async_trait::async_trait;
use statsapp_models::{AccuracyStats, DateRange, EdgePrediction, PredictionParams};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Client for precomputed ("edge") predictions. `Ok(None)` means nothing is
/// available for the pairing, which callers treat as the cue to compute
/// locally rather than as a failure.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemotePredictionClient: Send + Sync {
    async fn fetch_prediction(&self, params: &PredictionParams) -> Result<Option<EdgePrediction>>;

    /// Asks the service to recompute the pairing. `false` when it declined.
    async fn trigger_update(&self, params: &PredictionParams) -> Result<bool>;

    /// How past predictions over `range` fared. `Ok(None)` when the service
    /// has no report for it.
    async fn fetch_accuracy_stats(&self, range: &DateRange) -> Result<Option<AccuracyStats>>;
}

/// Stand-in when no prediction backend is configured: never has anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRemote;

#[async_trait]
impl RemotePredictionClient for UnconfiguredRemote {
    async fn fetch_prediction(&self, params: &PredictionParams) -> Result<Option<EdgePrediction>> {
        debug!(
            "No prediction backend configured for {} vs {}",
            params.home_team, params.away_team
        );
        Ok(None)
    }

    async fn trigger_update(&self, _params: &PredictionParams) -> Result<bool> {
        Ok(false)
    }

    async fn fetch_accuracy_stats(&self, _range: &DateRange) -> Result<Option<AccuracyStats>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_remote_has_nothing() {
        let remote = UnconfiguredRemote;
        let params = PredictionParams::new("Arsenal", "Chelsea");

        assert!(remote.fetch_prediction(&params).await.unwrap().is_none());
        assert!(!remote.trigger_update(&params).await.unwrap());

        let day = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let range = DateRange::new(day, day).unwrap();
        assert!(remote.fetch_accuracy_stats(&range).await.unwrap().is_none());
    }
}
