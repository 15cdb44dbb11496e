mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use serde_json::{json, Value};
use statsapp_ml::BaselineModel;
use statsapp_stream::{PredictionWorker, WorkerConfig, WorkerError, WorkerRequest, WorkerResponse};

fn worker() -> PredictionWorker {
    PredictionWorker::spawn(Arc::new(BaselineModel::new()), WorkerConfig::default())
}

async fn reply_json(worker: &mut PredictionWorker) -> Value {
    let reply = worker.next_reply().await.unwrap();
    serde_json::from_str(&reply.response.to_json().unwrap()).unwrap()
}

#[tokio::test]
async fn test_json_request_yields_prediction_result() {
    let mut worker = worker();
    let matches = serde_json::to_value(dominant_home_record("Barcelona", "Getafe")).unwrap();

    worker
        .post_json(
            json!({
                "type": "CALCULATE_PREDICTIONS",
                "payload": {
                    "homeTeam": "Barcelona",
                    "awayTeam": "Getafe",
                    "matches": matches,
                    "homeMatches": [],
                    "awayMatches": []
                }
            })
            .to_string(),
        )
        .await
        .unwrap();

    let reply = reply_json(&mut worker).await;
    assert_eq!(reply["type"], "PREDICTION_RESULT");
    assert_eq!(reply["payload"]["prediction_source"], "local");
    assert_eq!(reply["payload"]["model_version"], "baseline-v1.0");
    assert_eq!(reply["payload"]["key_factors"][0], "Barcelona excellent form");

    let home = reply["payload"]["home_win_probability"].as_f64().unwrap();
    let draw = reply["payload"]["draw_probability"].as_f64().unwrap();
    let away = reply["payload"]["away_win_probability"].as_f64().unwrap();
    assert!((home + draw + away - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_team_yields_error_message() {
    let mut worker = worker();
    worker
        .post_json(json!({ "type": "CALCULATE_PREDICTIONS", "payload": { "awayTeam": "Getafe" } }).to_string())
        .await
        .unwrap();

    assert_eq!(
        reply_json(&mut worker).await,
        json!({ "type": "ERROR", "payload": { "message": "Invalid input: home team is required" } })
    );
}

#[tokio::test]
async fn test_unknown_type_yields_error_and_worker_keeps_serving() {
    let mut worker = worker();
    worker
        .post_json(json!({ "type": "SUBSCRIBE", "payload": {} }).to_string())
        .await
        .unwrap();

    assert_eq!(
        reply_json(&mut worker).await["payload"]["message"],
        "Unknown message type: SUBSCRIBE"
    );
    assert!(worker.request(barcelona_getafe()).await.is_ok());
}

#[tokio::test]
async fn test_latest_request_wins() {
    let mut worker = worker();

    worker
        .post(WorkerRequest::CalculatePredictions(
            barcelona_getafe().with_head_to_head(dominant_home_record("Barcelona", "Getafe")),
        ))
        .await
        .unwrap();
    let latest = worker.request(barcelona_getafe()).await.unwrap();

    // the reply to the first message was dropped, so this is the empty-history result
    assert_eq!(latest.confidence_score, 0.3);
}

#[tokio::test]
async fn test_sequence_numbers_are_monotonic() {
    let mut worker = worker();
    let mut previous = 0;
    for _ in 0..5 {
        let seq = worker
            .post(WorkerRequest::CalculatePredictions(barcelona_getafe()))
            .await
            .unwrap();
        assert!(seq > previous);
        previous = seq;
    }

    for _ in 0..5 {
        let reply = worker.next_reply().await.unwrap();
        assert!(matches!(reply.response, WorkerResponse::PredictionResult(_)));
    }
}

#[tokio::test]
async fn test_teardown_rejects_further_requests() {
    let mut worker = PredictionWorker::spawn(
        Arc::new(BaselineModel::new()),
        WorkerConfig {
            queue_capacity: 1,
            response_timeout: Duration::from_secs(1),
        },
    );
    assert!(worker.is_running());

    worker.shutdown().await;
    assert!(!worker.is_running());
    assert_eq!(
        worker.post(WorkerRequest::CalculatePredictions(barcelona_getafe())).await,
        Err(WorkerError::Closed)
    );
}
