use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

const MAX_LATENCY_SAMPLES: usize = 1000;

/// Where a prediction request was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    Cache,
    Edge,
    Local,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionMetrics {
    pub timestamp: Option<DateTime<Utc>>,
    pub uptime_seconds: u64,
    pub requests: u64,
    pub cache_hits: u64,
    pub edge_resolutions: u64,
    pub local_resolutions: u64,
    pub error_count: u64,
    pub last_latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub avg_resolution_time_ms: f64,
    pub cache_hit_rate: f64,
    pub local_fallback_rate: f64,
    pub error_rate_percent: f64,
}

#[derive(Debug)]
pub struct LatencyTracker {
    start_time: Instant,
}

impl LatencyTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub async fn finish(self, metrics: &MetricsCollector, kind: ResolutionKind) {
        metrics.record_resolution(kind, self.start_time.elapsed()).await;
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct MetricsCollector {
    start_time: Instant,
    metrics: Arc<RwLock<PredictionMetrics>>,
    latencies: Arc<RwLock<VecDeque<Duration>>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            metrics: Arc::new(RwLock::new(PredictionMetrics::default())),
            latencies: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    pub async fn increment_requests(&self) {
        let mut metrics = self.metrics.write().await;
        metrics.requests += 1;
    }

    pub async fn increment_errors(&self) {
        let mut metrics = self.metrics.write().await;
        metrics.error_count += 1;
    }

    pub async fn record_resolution(&self, kind: ResolutionKind, duration: Duration) {
        {
            let mut latencies = self.latencies.write().await;
            latencies.push_back(duration);
            if latencies.len() > MAX_LATENCY_SAMPLES {
                latencies.pop_front();
            }
        }

        let mut metrics = self.metrics.write().await;
        match kind {
            ResolutionKind::Cache => metrics.cache_hits += 1,
            ResolutionKind::Edge => metrics.edge_resolutions += 1,
            ResolutionKind::Local => metrics.local_resolutions += 1,
        }
        metrics.last_latency_ms = duration.as_secs_f64() * 1000.0;
    }

    pub fn start_latency_tracking(&self) -> LatencyTracker {
        LatencyTracker::new()
    }

    pub async fn get_current_metrics(&self) -> PredictionMetrics {
        let mut metrics = self.metrics.read().await.clone();
        metrics.uptime_seconds = self.start_time.elapsed().as_secs();
        metrics.timestamp = Some(Utc::now());
        metrics
    }

    pub async fn get_performance_stats(&self) -> PerformanceStats {
        let metrics = self.get_current_metrics().await;
        let latencies = self.latencies.read().await;

        let avg_resolution_time_ms = if latencies.is_empty() {
            0.0
        } else {
            let sum: Duration = latencies.iter().sum();
            sum.as_secs_f64() * 1000.0 / latencies.len() as f64
        };

        let share = |count: u64| {
            if metrics.requests > 0 {
                count as f64 / metrics.requests as f64
            } else {
                0.0
            }
        };

        PerformanceStats {
            avg_resolution_time_ms,
            cache_hit_rate: share(metrics.cache_hits),
            local_fallback_rate: share(metrics.local_resolutions),
            error_rate_percent: share(metrics.error_count) * 100.0,
        }
    }

    pub async fn log_performance_summary(&self) {
        let stats = self.get_performance_stats().await;
        let metrics = self.get_current_metrics().await;

        info!("📈 Prediction summary:");
        info!("   Requests: {}", metrics.requests);
        info!("   Cache hits: {}", metrics.cache_hits);
        info!("   Edge predictions: {}", metrics.edge_resolutions);
        info!("   Local predictions: {}", metrics.local_resolutions);
        info!("   Errors: {}", metrics.error_count);
        info!("   Average resolution time: {:.2}ms", stats.avg_resolution_time_ms);
        info!("   Cache hit rate: {:.1}%", stats.cache_hit_rate * 100.0);
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
