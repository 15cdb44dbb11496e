use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use statsapp_models::{DateRange, PredictionParams};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub oldest_age: Option<Duration>,
    pub newest_age: Option<Duration>,
}

/// Key/value cache whose entries expire after a per-entry time to live.
/// Expired entries are dropped when read and by [`TtlCache::sweep_expired`].
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let now = Instant::now();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                expires_at: now + ttl,
            },
        );
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }

        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    pub fn contains(&self, key: &K) -> bool {
        let now = Instant::now();
        let live = match self.entries.get(key) {
            Some(entry) => !entry.is_expired(now),
            None => return false,
        };

        if !live {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        live
    }

    /// Removes the entry, returning its value if it had not expired yet.
    pub fn remove(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        self.entries
            .remove(key)
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.value)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of live entries. Sweeps expired ones first.
    pub fn len(&self) -> usize {
        self.sweep_expired();
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<K> {
        self.sweep_expired();
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn stats(&self) -> CacheStats {
        self.sweep_expired();
        let now = Instant::now();
        let ages: Vec<Duration> = self
            .entries
            .iter()
            .map(|entry| now.saturating_duration_since(entry.inserted_at))
            .collect();

        CacheStats {
            entries: ages.len(),
            oldest_age: ages.iter().max().copied(),
            newest_age: ages.iter().min().copied(),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Sweeps expired entries every `period` until `cancel` fires.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let period = period.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.sweep_expired();
                        if removed > 0 {
                            debug!("🧹 Swept {} expired cache entries", removed);
                        }
                    }
                }
            }

            debug!("Cache sweeper stopped");
        })
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

/// Cache key for one team pairing in one league.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictionKey {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
}

impl From<&PredictionParams> for PredictionKey {
    fn from(params: &PredictionParams) -> Self {
        Self {
            home_team: params.home_team.clone(),
            away_team: params.away_team.clone(),
            league: params.league_or_default().to_string(),
        }
    }
}

impl fmt::Display for PredictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prediction_{}_{}_{}", self.home_team, self.away_team, self.league)
    }
}

/// Cache key for an accuracy report over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatsKey(pub DateRange);

impl From<DateRange> for StatsKey {
    fn from(range: DateRange) -> Self {
        Self(range)
    }
}

impl fmt::Display for StatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stats_{}_{}", self.0.from, self.0.to)
    }
}
