use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use statsapp_ml::ModelParams;
use statsapp_services::PredictorConfig;
use statsapp_stream::WorkerConfig;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelParams,
    pub cache: CacheConfig,
    pub worker: WorkerSettings,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSettings {
    pub queue_capacity: usize,
    pub response_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub history_limit: usize,
    pub default_league: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Self::defaults()?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from environment variables, e.g. STATSAPP__CACHE__TTL_SECONDS
            .add_source(
                Environment::with_prefix("STATSAPP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("cache.ttl_seconds", 1800)?
            .set_default("cache.sweep_interval_seconds", 60)?
            .set_default("worker.queue_capacity", 16)?
            .set_default("worker.response_timeout_ms", 5000)?
            .set_default("lookup.history_limit", 50)?
            .set_default("lookup.default_league", "Premier League")
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let app: Self = config.try_deserialize()?;
        app.model
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        if app.worker.queue_capacity == 0 {
            return Err(ConfigError::Message(
                "worker.queue_capacity must be at least 1".into(),
            ));
        }
        Ok(app)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache.sweep_interval_seconds)
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            queue_capacity: self.worker.queue_capacity,
            response_timeout: Duration::from_millis(self.worker.response_timeout_ms),
        }
    }

    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig {
            cache_ttl: self.cache_ttl(),
            worker: self.worker_config(),
        }
    }
}
