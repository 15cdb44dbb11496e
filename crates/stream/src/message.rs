// Wire contract between callers and the prediction worker

use serde::{Deserialize, Serialize};
use serde_json::Value;
use statsapp_models::{BaselinePrediction, PredictionRequest};

pub const CALCULATE_PREDICTIONS: &str = "CALCULATE_PREDICTIONS";
pub const PREDICTION_RESULT: &str = "PREDICTION_RESULT";
pub const ERROR: &str = "ERROR";

/// Inbound message, `{ "type": "CALCULATE_PREDICTIONS", "payload": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRequest {
    CalculatePredictions(PredictionRequest),
}

/// Outbound message. Every inbound message produces exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerResponse {
    PredictionResult(BaselinePrediction),
    Error(ErrorPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A response tagged with the sequence number of the message it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReply {
    pub seq: u64,
    pub response: WorkerResponse,
}

impl WorkerRequest {
    pub fn message_type(&self) -> &'static str {
        match self {
            WorkerRequest::CalculatePredictions(_) => CALCULATE_PREDICTIONS,
        }
    }
}

impl WorkerResponse {
    pub fn message_type(&self) -> &'static str {
        match self {
            WorkerResponse::PredictionResult(_) => PREDICTION_RESULT,
            WorkerResponse::Error(_) => ERROR,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        WorkerResponse::Error(ErrorPayload::new(message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WorkerResponse::Error(_))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Decodes a raw inbound message. The failure side is already the payload of
/// the `ERROR` reply the worker sends back.
pub fn decode(raw: &str) -> Result<WorkerRequest, ErrorPayload> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ErrorPayload::new(format!("Malformed message: {e}")))?;

    let message_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ErrorPayload::new("Malformed message: missing type"))?;

    if message_type != CALCULATE_PREDICTIONS {
        return Err(ErrorPayload::new(format!(
            "Unknown message type: {message_type}"
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| ErrorPayload::new(format!("Malformed payload: {e}")))
}
