mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use statsapp_ml::{BaselineModel, MatchStatistics, TeamRecord};
use statsapp_models::{
    AccuracyStats, DateRange, EdgePrediction, MatchHistory, PredictionParams, PredictionSource,
};
use statsapp_services::{
    gather_history, MatchLookup, OfflineMatchStore, PredictionKey, PredictorConfig,
    PredictorService, RemotePredictionClient, UnconfiguredRemote,
};
use statsapp_stream::WorkerConfig;
use uuid::Uuid;

mock! {
    pub Remote {}

    #[async_trait]
    impl RemotePredictionClient for Remote {
        async fn fetch_prediction(&self, params: &PredictionParams) -> anyhow::Result<Option<EdgePrediction>>;
        async fn trigger_update(&self, params: &PredictionParams) -> anyhow::Result<bool>;
        async fn fetch_accuracy_stats(&self, range: &DateRange) -> anyhow::Result<Option<AccuracyStats>>;
    }
}

fn offline_service(cache_ttl: Duration) -> PredictorService {
    PredictorService::new(
        Arc::new(BaselineModel::new()),
        Arc::new(UnconfiguredRemote),
        PredictorConfig {
            cache_ttl,
            worker: WorkerConfig::default(),
        },
    )
}

fn fresh_edge(params: &PredictionParams, valid_for: chrono::Duration) -> EdgePrediction {
    let local = statsapp_ml::compute_baseline(&params.home_team, &params.away_team, &[], &[], &[])
        .unwrap();
    let now = Utc::now();
    EdgePrediction {
        id: Uuid::new_v4(),
        home_team: params.home_team.clone(),
        away_team: params.away_team.clone(),
        league: params.league_or_default().to_string(),
        prediction: local,
        generated_at: now,
        expires_at: now + valid_for,
    }
}

#[tokio::test]
async fn test_offline_store_feeds_local_prediction() {
    let store = OfflineMatchStore::new();
    let params = PredictionParams::new("Barcelona", "Real Madrid").with_league("spain");
    let history = gather_history(&store, &params, 50).await.unwrap();

    assert_eq!(history.head_to_head.len(), 1);
    assert!(history.home_matches.is_empty());
    assert!(history.away_matches.is_empty());

    let service = offline_service(Duration::from_secs(1800));
    let prediction = service.predict(&params, history).await.unwrap();

    assert_eq!(prediction.prediction_source, PredictionSource::Local);
    assert!((prediction.confidence_score - 0.33).abs() < 1e-12);
    assert!(service
        .cache()
        .contains(&PredictionKey::from(&params)));
    service.shutdown().await;
}

#[tokio::test]
async fn test_descriptive_statistics_over_offline_data() {
    let store = OfflineMatchStore::new();
    let all = store.all_matches(100).await.unwrap();
    let stats = MatchStatistics::from_matches(&all);

    assert_eq!(stats.total_matches, 10);
    assert!((stats.both_teams_scored_percentage - 60.0).abs() < 1e-9);
    assert!((stats.home_win_percentage - 50.0).abs() < 1e-9);
    assert!((stats.draw_percentage - 30.0).abs() < 1e-9);
    assert!((stats.away_win_percentage - 20.0).abs() < 1e-9);

    let getafe = TeamRecord::from_matches("Getafe", &store.search_by_team("getafe", 50).await.unwrap());
    assert_eq!(getafe.played, 1);
    assert_eq!(getafe.points(), 3);
    assert_eq!(getafe.goal_difference(), 2);
}

#[tokio::test]
async fn test_local_prediction_is_recomputed_after_cache_expiry() {
    let service = offline_service(Duration::from_millis(50));
    let params = PredictionParams::new("Arsenal", "Chelsea");

    service.predict(&params, MatchHistory::default()).await.unwrap();
    service.predict(&params, MatchHistory::default()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    service.predict(&params, MatchHistory::default()).await.unwrap();

    let metrics = service.metrics().get_current_metrics().await;
    assert_eq!(metrics.requests, 3);
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.local_resolutions, 2);
}

#[tokio::test]
async fn test_edge_prediction_preferred_over_local() {
    let mut remote = MockRemote::new();
    remote
        .expect_fetch_prediction()
        .withf(|p| p.league_or_default() == "england")
        .times(1)
        .returning(|p| Ok(Some(fresh_edge(p, chrono::Duration::minutes(5)))));

    let service = PredictorService::new(
        Arc::new(BaselineModel::new()),
        Arc::new(remote),
        PredictorConfig::default(),
    );
    let params = PredictionParams::new("Arsenal", "Chelsea").with_league("england");

    let prediction = service.predict(&params, MatchHistory::default()).await.unwrap();
    assert_eq!(prediction.prediction_source, PredictionSource::Edge);

    let cached = service.predict(&params, MatchHistory::default()).await.unwrap();
    assert_eq!(cached, prediction);
}

#[tokio::test(start_paused = true)]
async fn test_edge_prediction_is_not_cached_past_its_expiry() {
    let mut remote = MockRemote::new();
    remote
        .expect_fetch_prediction()
        .times(2)
        .returning(|p| Ok(Some(fresh_edge(p, chrono::Duration::seconds(30)))));

    let service = PredictorService::new(
        Arc::new(BaselineModel::new()),
        Arc::new(remote),
        PredictorConfig::default(),
    );
    let params = PredictionParams::new("PSG", "Marseille");

    service.predict(&params, MatchHistory::default()).await.unwrap();
    tokio::time::advance(Duration::from_secs(31)).await;
    let again = service.predict(&params, MatchHistory::default()).await.unwrap();

    assert_eq!(again.prediction_source, PredictionSource::Edge);
}

#[tokio::test]
async fn test_trigger_update_without_backend_is_declined() {
    let service = offline_service(Duration::from_secs(60));
    let params = PredictionParams::new("Juventus", "Inter");

    service.predict(&params, MatchHistory::default()).await.unwrap();
    assert!(!service.trigger_update(&params).await);
    assert!(service.cache().contains(&PredictionKey::from(&params)));
}

#[tokio::test]
async fn test_accuracy_report_from_remote_service() {
    let range = DateRange::new(
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    )
    .unwrap();

    let mut remote = MockRemote::new();
    remote.expect_fetch_accuracy_stats().times(1).returning(|_| {
        Ok(Some(
            serde_json::from_str(
                r#"{"total_predictions": 40, "correct_predictions": 22,
                    "accuracy_percentage": 55.0, "average_confidence": 0.6,
                    "brier_score": 0.19, "calibration_data": []}"#,
            )
            .unwrap(),
        ))
    });

    let service = PredictorService::new(
        Arc::new(BaselineModel::new()),
        Arc::new(remote),
        PredictorConfig::default(),
    );
    let stats = service.accuracy_stats(range).await.unwrap();

    assert_eq!(stats.total_predictions, 40);
    assert!((stats.brier_score - 0.19).abs() < 1e-12);
    assert_eq!(stats.expected_calibration_error(), None);
    assert!(offline_service(Duration::from_secs(60)).accuracy_stats(range).await.is_none());
}
