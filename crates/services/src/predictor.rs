//! Prediction service.
//!
//! Resolves a prediction for a pairing in three steps: a live cache entry,
//! then a fresh and well-formed edge prediction from the remote service, then
//! the local baseline worker. Whatever answers is cached under the pairing's
//! key. An edge prediction is never cached past its own expiry.
//!
//! Accuracy reports for past predictions come only from the remote service
//! and are cached per date range.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use statsapp_ml::PredictionModel;
use statsapp_models::{
    AccuracyStats, BaselinePrediction, DateRange, MatchHistory, PredictionParams,
    PredictionRequest, PredictionSource,
};
use statsapp_stream::{PredictionWorker, WorkerConfig};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{PredictionKey, StatsKey, TtlCache, DEFAULT_CACHE_TTL};
use crate::metrics::{MetricsCollector, ResolutionKind};
use crate::remote::RemotePredictionClient;

pub type PredictionCache = TtlCache<PredictionKey, BaselinePrediction>;
pub type AccuracyCache = TtlCache<StatsKey, AccuracyStats>;

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub cache_ttl: Duration,
    pub worker: WorkerConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            worker: WorkerConfig::default(),
        }
    }
}

pub struct PredictorService {
    remote: Arc<dyn RemotePredictionClient>,
    worker: Mutex<PredictionWorker>,
    cache: Arc<PredictionCache>,
    stats_cache: AccuracyCache,
    metrics: MetricsCollector,
}

impl PredictorService {
    /// Spawns the local worker, so this must run inside a tokio runtime.
    pub fn new(
        model: Arc<dyn PredictionModel>,
        remote: Arc<dyn RemotePredictionClient>,
        config: PredictorConfig,
    ) -> Self {
        info!(
            "🎯 Starting PredictorService with {} {}",
            model.model_name(),
            model.model_version()
        );

        Self {
            remote,
            worker: Mutex::new(PredictionWorker::spawn(model, config.worker)),
            cache: Arc::new(TtlCache::new(config.cache_ttl)),
            stats_cache: TtlCache::new(config.cache_ttl),
            metrics: MetricsCollector::new(),
        }
    }

    pub fn cache(&self) -> &Arc<PredictionCache> {
        &self.cache
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub async fn predict(
        &self,
        params: &PredictionParams,
        history: MatchHistory,
    ) -> Result<BaselinePrediction> {
        let request = PredictionRequest::from_parts(params, history);
        request.validate_teams()?;

        self.metrics.increment_requests().await;
        let tracker = self.metrics.start_latency_tracking();
        let key = PredictionKey::from(params);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            tracker.finish(&self.metrics, ResolutionKind::Cache).await;
            return Ok(cached);
        }

        if let Some(prediction) = self.fetch_edge(params, &key).await {
            tracker.finish(&self.metrics, ResolutionKind::Edge).await;
            return Ok(prediction);
        }

        let result = self.worker.lock().await.request(request).await;
        match result {
            Ok(prediction) => {
                info!(
                    "🧮 Local prediction for {}: {:.3}/{:.3}/{:.3}",
                    key,
                    prediction.home_win_probability,
                    prediction.draw_probability,
                    prediction.away_win_probability
                );
                self.cache.insert(key, prediction.clone());
                tracker.finish(&self.metrics, ResolutionKind::Local).await;
                Ok(prediction)
            }
            Err(e) => {
                self.metrics.increment_errors().await;
                Err(e).with_context(|| format!("local prediction failed for {key}"))
            }
        }
    }

    async fn fetch_edge(
        &self,
        params: &PredictionParams,
        key: &PredictionKey,
    ) -> Option<BaselinePrediction> {
        let edge = match self.remote.fetch_prediction(params).await {
            Ok(Some(edge)) => edge,
            Ok(None) => {
                debug!("No edge prediction for {}, using local model", key);
                return None;
            }
            Err(e) => {
                warn!("⚠️ Edge lookup failed for {}, using local model: {:#}", key, e);
                return None;
            }
        };

        let Some(remaining) = edge.remaining_ttl(Utc::now()) else {
            debug!("Edge prediction {} for {} has expired", edge.id, key);
            return None;
        };

        if let Err(e) = edge.prediction.validate() {
            warn!("⚠️ Edge prediction {} for {} is malformed, using local model: {}", edge.id, key, e);
            return None;
        }

        let mut prediction = edge.prediction;
        prediction.prediction_source = PredictionSource::Edge;
        self.cache.insert_with_ttl(
            key.clone(),
            prediction.clone(),
            remaining.min(self.cache.default_ttl()),
        );
        info!("📡 Edge prediction {} for {}", edge.id, key);

        Some(prediction)
    }

    /// Asks the remote service to recompute the pairing and evicts the cached
    /// entry when it accepts. Failures are logged and reported as `false`.
    pub async fn trigger_update(&self, params: &PredictionParams) -> bool {
        let key = PredictionKey::from(params);
        match self.remote.trigger_update(params).await {
            Ok(true) => {
                self.cache.remove(&key);
                info!("🔄 Triggered prediction update for {}", key);
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.metrics.increment_errors().await;
                warn!("Failed to trigger prediction update for {}: {:#}", key, e);
                false
            }
        }
    }

    /// Accuracy of past predictions over `range`. `None` when the remote
    /// service has no report or cannot be reached.
    pub async fn accuracy_stats(&self, range: DateRange) -> Option<AccuracyStats> {
        let key = StatsKey::from(range);
        if let Some(cached) = self.stats_cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Some(cached);
        }

        match self.remote.fetch_accuracy_stats(&range).await {
            Ok(Some(stats)) => {
                info!(
                    "📊 Accuracy for {}: {:.1}% of {} predictions, Brier {:.3}",
                    key, stats.accuracy_percentage, stats.total_predictions, stats.brier_score
                );
                self.stats_cache.insert(key, stats.clone());
                Some(stats)
            }
            Ok(None) => {
                debug!("No accuracy report for {}", key);
                None
            }
            Err(e) => {
                self.metrics.increment_errors().await;
                warn!("Failed to fetch accuracy stats for {}: {:#}", key, e);
                None
            }
        }
    }

    /// Drops cached predictions and accuracy reports.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.stats_cache.clear();
    }

    /// Stops the local worker. Later local fallbacks fail.
    pub async fn shutdown(&self) {
        self.worker.lock().await.shutdown().await;
        info!("PredictorService stopped");
    }
}
